//! Per-request authentication decision.
//!
//! Strict order, first failure wins:
//! exemption -> bearer extraction -> revocation lookup -> signature/expiry check.
//!
//! The gate holds only read-only, process-wide pieces. Everything that belongs
//! to one request is returned to the caller.

use std::{fmt, sync::Arc};

use axum::http::{HeaderMap, Method};
use sha2::{Digest, Sha256};

use crate::services::auth::{
    bearer,
    error::AuthError,
    exemption::ExemptionMatcher,
    identity::Identity,
    revocation::RevocationStore,
    verifier::{TokenClaims, TokenVerifier},
};

/// Outcome of a successful check.
#[derive(Debug, PartialEq, Eq)]
pub enum Verdict {
    /// No authentication required; nothing was inspected.
    Exempt,
    /// Token verified and not revoked.
    Authenticated {
        identity: Identity,
        claims: TokenClaims,
        token: String,
    },
}

pub struct AuthGate {
    exemptions: ExemptionMatcher,
    verifier: Arc<dyn TokenVerifier>,
    revocation: Arc<dyn RevocationStore>,
    echo_token: bool,
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("exemptions", &self.exemptions)
            .field("revocation_backend", &self.revocation.backend_name())
            .field("echo_token", &self.echo_token)
            .finish()
    }
}

impl AuthGate {
    pub fn new(
        exemptions: ExemptionMatcher,
        verifier: Arc<dyn TokenVerifier>,
        revocation: Arc<dyn RevocationStore>,
        echo_token: bool,
    ) -> Self {
        Self {
            exemptions,
            verifier,
            revocation,
            echo_token,
        }
    }

    pub fn echo_token(&self) -> bool {
        self.echo_token
    }

    pub async fn check(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<Verdict, AuthError> {
        if self.exemptions.is_exempt(method, path) {
            return Ok(Verdict::Exempt);
        }

        let token = bearer::extract(headers).ok_or(AuthError::MissingToken)?;

        // Store failure is not "not revoked": fail closed.
        let revoked = self
            .revocation
            .is_revoked(token)
            .await
            .map_err(AuthError::StoreUnavailable)?;
        if revoked {
            return Err(AuthError::RevokedToken);
        }

        let claims = self
            .verifier
            .verify(token)
            .map_err(AuthError::InvalidToken)?;

        Ok(Verdict::Authenticated {
            identity: Identity::from(&claims),
            claims,
            token: token.to_string(),
        })
    }
}

/// Short, non-reversible token tag for logs (first 8 bytes of SHA-256, hex).
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..8])
}
