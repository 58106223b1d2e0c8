use thiserror::Error;

use crate::services::auth::{revocation::RevocationError, verifier::TokenError};

/// Why a request was refused.
///
/// Every variant is rendered to the client as the same 401; the variants only
/// exist so logs can tell them apart.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or malformed bearer token")]
    MissingToken,

    #[error("token has been revoked")]
    RevokedToken,

    #[error("revocation store unavailable: {0}")]
    StoreUnavailable(#[source] RevocationError),

    #[error("invalid token: {0}")]
    InvalidToken(#[source] TokenError),
}

impl AuthError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::RevokedToken => "revoked_token",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::InvalidToken(_) => "invalid_token",
        }
    }

    /// Finer-grained label: the verification failure for invalid tokens.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidToken(e) => e.reason(),
            other => other.kind(),
        }
    }
}
