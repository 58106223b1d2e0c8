//! Cache client interface used by higher-level services (token revocation lookups).
use async_trait::async_trait;
use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-layer errors (transport/command/timeout).
///
/// Note:
/// - Kept independent from `AppError` so callers decide how to fail
///   (the revocation lookup fails closed).
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    BackendConnection(String),
    #[error("cache command error: {0}")]
    BackendCommand(String),
    #[error("cache command timed out after {0}ms")]
    Timeout(u128),
}

/// A minimal, read-only cache interface.
///
/// The gate only ever asks "does this key exist?". Writers (logout, admin
/// revocation) live in other services and share the same backend.
///
/// Implementations must be cheap to clone (typically `Arc<...>` inside).
#[async_trait]
pub trait CacheClient: Clone + Send + Sync + 'static {
    // Returns the cache backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // `EXISTS <key>`: true when the key is present and not expired.
    async fn exists(&self, key: &str) -> CacheResult<bool>;
}
