//! Response Cache
//!
//! Whole-response memoization for the listing endpoint, keyed by request URI.
//! Lookups and writes are best-effort: an unreachable store just means the
//! response is rendered fresh.

use std::sync::Arc;

use axum::http::Uri;
use tracing::{debug, warn};

use crate::cache::CacheBackend;

/// Prefix of every response-cache key; the default invalidation pattern
/// matches it.
pub const RESPONSE_CACHE_PREFIX: &str = "views.decorators.cache.cache_page.";

// == Response Cache ==
/// Rendered listing bodies cached per request URI.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheBackend>,
    ttl_secs: u64,
}

impl ResponseCache {
    /// Creates a response cache whose entries live for `ttl_secs`.
    pub fn new(store: Arc<dyn CacheBackend>, ttl_secs: u64) -> Self {
        Self { store, ttl_secs }
    }

    /// Cache key for `uri`: the prefix followed by the path and query.
    pub fn key_for(uri: &Uri) -> String {
        let target = uri
            .path_and_query()
            .map_or_else(|| uri.path(), |pq| pq.as_str());
        format!("{}{}", RESPONSE_CACHE_PREFIX, target)
    }

    /// Returns the cached body under `key`. Store failures read as a miss.
    pub async fn lookup(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, key, "response cache lookup failed");
                None
            }
        }
    }

    /// Caches `body` under `key`, logging instead of failing on store errors.
    pub async fn store(&self, key: &str, body: &str) {
        match self.store.set(key, body, self.ttl_secs).await {
            Ok(()) => debug!(key, ttl = self.ttl_secs, "cached response"),
            Err(err) => warn!(error = %err, key, "response cache write failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::UnreachableStore;
    use crate::cache::{KeyTtl, MemoryStore};

    #[test]
    fn test_key_includes_query() {
        let uri: Uri = "/properties/?page=2".parse().unwrap();
        assert_eq!(
            ResponseCache::key_for(&uri),
            "views.decorators.cache.cache_page./properties/?page=2"
        );
    }

    #[tokio::test]
    async fn test_store_then_lookup() {
        let store = Arc::new(MemoryStore::new());
        let cache = ResponseCache::new(store.clone(), 900);

        cache.store("k", "{}").await;

        assert_eq!(cache.lookup("k").await.as_deref(), Some("{}"));
        assert_eq!(store.ttl("k").await.unwrap(), KeyTtl::Expires(900));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_a_miss() {
        let cache = ResponseCache::new(Arc::new(UnreachableStore), 900);
        cache.store("k", "{}").await;
        assert!(cache.lookup("k").await.is_none());
    }
}
