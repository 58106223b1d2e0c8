use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use crate::services::{
    auth::revocation::store::{RevocationError, RevocationStore},
    cache::{CacheClient, CacheError, ValkeyClient},
};

/// Valkey-backed revocation store (Redis protocol).
///
/// Any backend error, or a lookup slower than `timeout`, is returned as `Err`;
/// the gate turns that into a 401.
#[derive(Clone)]
pub struct ValkeyRevocationStore<C: CacheClient> {
    cache: Arc<C>,
    // Empty by default: the key is the exact raw token.
    prefix: String,
    timeout: Duration,
}

impl ValkeyRevocationStore<ValkeyClient> {
    pub async fn connect(
        redis_url: &str,
        prefix: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RevocationError> {
        let client = ValkeyClient::new(redis_url).await?;

        Ok(Self::new_with_cache(Arc::new(client), prefix, timeout))
    }
}

impl<C: CacheClient> ValkeyRevocationStore<C> {
    pub fn new_with_cache(cache: Arc<C>, prefix: impl Into<String>, timeout: Duration) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
            timeout,
        }
    }

    pub fn key(&self, token: &str) -> String {
        format!("{}{}", self.prefix, token)
    }
}

impl<C: CacheClient> RevocationStore for ValkeyRevocationStore<C> {
    fn is_revoked<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool, RevocationError>> + Send + 'a>> {
        Box::pin(async move {
            let key = self.key(token);
            let revoked = tokio::time::timeout(self.timeout, self.cache.exists(&key))
                .await
                .map_err(|_| CacheError::Timeout(self.timeout.as_millis()))??;
            Ok(revoked)
        })
    }

    fn backend_name(&self) -> &'static str {
        self.cache.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::testing::MemoryCache;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn looks_up_the_raw_token_when_no_prefix_is_set() {
        let cache = Arc::new(MemoryCache::with_keys(["abc.def.ghi"]));
        let store = ValkeyRevocationStore::new_with_cache(cache.clone(), "", TIMEOUT);

        assert_eq!(store.key("abc.def.ghi"), "abc.def.ghi");
        assert!(store.is_revoked("abc.def.ghi").await.unwrap());
        assert!(!store.is_revoked("other").await.unwrap());
        assert_eq!(cache.lookups(), vec!["abc.def.ghi", "other"]);
    }

    #[tokio::test]
    async fn prefix_namespaces_the_key() {
        let cache = Arc::new(MemoryCache::with_keys(["blacklist:tok"]));
        let store = ValkeyRevocationStore::new_with_cache(cache, "blacklist:", TIMEOUT);

        assert!(store.is_revoked("tok").await.unwrap());
        assert_eq!(store.backend_name(), "memory");
    }

    #[tokio::test]
    async fn backend_failure_is_an_error_not_a_negative() {
        let cache = Arc::new(MemoryCache::failing());
        let store = ValkeyRevocationStore::new_with_cache(cache, "", TIMEOUT);

        let err = store.is_revoked("tok").await.unwrap_err();
        assert!(matches!(
            err,
            RevocationError::Cache(CacheError::BackendConnection(_))
        ));
    }

    #[tokio::test]
    async fn slow_backend_times_out_as_an_error() {
        let cache = Arc::new(MemoryCache::stalled());
        let store = ValkeyRevocationStore::new_with_cache(cache, "", Duration::from_millis(20));

        let err = store.is_revoked("tok").await.unwrap_err();
        assert!(
            matches!(err, RevocationError::Cache(CacheError::Timeout(20))),
            "{err:?}"
        );
    }
}
