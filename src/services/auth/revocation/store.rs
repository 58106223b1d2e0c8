use std::{future::Future, pin::Pin};

use crate::services::cache::CacheError;

/// Revocation lookup result:
/// - `Ok(true)`: token is on the deny-list
/// - `Ok(false)`: token is not on the deny-list
/// - `Err(_)`: store failure (callers treat it as fail-closed)
pub trait RevocationStore: Send + Sync {
    // Single key-existence check keyed by the raw token string.
    //
    // Must not write. Entries and their TTL are owned by whoever revokes.
    fn is_revoked<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool, RevocationError>> + Send + 'a>>;

    // Backend name, for diagnostics only.
    fn backend_name(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum RevocationError {
    #[error(transparent)]
    Cache(#[from] CacheError),
}
