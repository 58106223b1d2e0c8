//! In-memory doubles for the auth collaborators (test builds only).
use std::{
    collections::HashSet,
    future::Future,
    pin::Pin,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::json;

use crate::services::auth::{
    revocation::{RevocationError, RevocationStore},
    verifier::{TokenClaims, TokenError, TokenVerifier},
};
use crate::services::cache::{CacheClient, CacheError, client::CacheResult};

pub const SECRET: &[u8] = b"test-secret-that-is-long-enough-for-hs256";

pub fn mint_with(alg: Algorithm, secret: &[u8], claims: serde_json::Value) -> String {
    jsonwebtoken::encode(
        &Header::new(alg),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

/// HS256 token for `sub`, expiring `ttl_seconds` from now (negative = already expired).
pub fn mint(sub: &str, ttl_seconds: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    mint_with(
        Algorithm::HS256,
        SECRET,
        json!({ "sub": sub, "iat": now, "exp": now + ttl_seconds }),
    )
}

#[derive(Clone, Default)]
pub struct MemoryCache {
    keys: Arc<Mutex<HashSet<String>>>,
    lookups: Arc<Mutex<Vec<String>>>,
    fail: bool,
    stall: bool,
}

impl MemoryCache {
    pub fn with_keys<I: IntoIterator<Item = &'static str>>(keys: I) -> Self {
        Self {
            keys: Arc::new(Mutex::new(keys.into_iter().map(String::from).collect())),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// A backend that accepts the command and never answers.
    pub fn stalled() -> Self {
        Self {
            stall: true,
            ..Default::default()
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        self.lookups.lock().unwrap().push(key.to_string());
        if self.stall {
            std::future::pending::<()>().await;
        }
        if self.fail {
            return Err(CacheError::BackendConnection("connection refused".into()));
        }
        Ok(self.keys.lock().unwrap().contains(key))
    }
}

/// Deny-list that records how often it was consulted.
#[derive(Default)]
pub struct MemoryRevocationStore {
    revoked: Mutex<HashSet<String>>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryRevocationStore {
    pub fn revoke(&self, token: &str) {
        self.revoked.lock().unwrap().insert(token.to_string());
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RevocationStore for MemoryRevocationStore {
    fn is_revoked<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool, RevocationError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(CacheError::BackendConnection("store down".into()).into());
            }
            Ok(self.revoked.lock().unwrap().contains(token))
        })
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Wraps a verifier and counts invocations.
pub struct CountingVerifier<V> {
    inner: V,
    calls: AtomicUsize,
}

impl<V> CountingVerifier<V> {
    pub fn new(inner: V) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<V: TokenVerifier> TokenVerifier for CountingVerifier<V> {
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(token)
    }
}
