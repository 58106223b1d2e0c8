use crate::services::auth::verifier::TokenClaims;

/// The authenticated caller of the current request.
///
/// - Lives in the request's extensions; it is created by the gate after a
///   successful verification and dropped with the request.
/// - `authorities` is always empty: the gate authenticates, it does not authorise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub authorities: Vec<String>,
}

impl Identity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            authorities: Vec::new(),
        }
    }
}

impl From<&TokenClaims> for Identity {
    fn from(claims: &TokenClaims) -> Self {
        Self::new(claims.sub.clone())
    }
}
