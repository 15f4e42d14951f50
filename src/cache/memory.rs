//! Memory Store Module
//!
//! In-process cache store with TTL expiration and keyspace hit/miss counters,
//! behaving like the Redis store for a single process.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{glob_match, CacheBackend, CacheEntry, Clock, KeyTtl, StoreStats, SystemClock};
use crate::error::Result;

#[derive(Debug, Default)]
struct Inner {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Lifetime lookup statistics
    stats: StoreStats,
}

// == Memory Store ==
/// In-memory cache storage with TTL support.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            clock,
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut inner = self.inner.write().await;
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - inner.entries.len()
    }

    // == Length ==
    /// Returns the number of stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryStore {
    // == Get ==
    /// Expired entries are removed on read and counted as misses.
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = self.clock.now_ms();
        let mut inner = self.inner.write().await;

        let live = match inner.entries.get(key).map(|entry| entry.is_expired_at(now)) {
            Some(true) => {
                inner.entries.remove(key);
                None
            }
            Some(false) => inner.entries.get(key).map(|entry| entry.value.clone()),
            None => None,
        };

        match live {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        Ok(live)
    }

    // == Set ==
    /// Overwrites any existing entry and resets its TTL.
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let entry = CacheEntry::new(value.to_string(), Some(ttl_secs), self.clock.now_ms());
        self.inner.write().await.entries.insert(key.to_string(), entry);
        Ok(())
    }

    // == Delete ==
    async fn delete(&self, key: &str) -> Result<bool> {
        let now = self.clock.now_ms();
        let removed = self.inner.write().await.entries.remove(key);
        Ok(removed.is_some_and(|entry| !entry.is_expired_at(now)))
    }

    // == Delete Matching ==
    async fn delete_matching(&self, pattern: &str) -> Result<usize> {
        let now = self.clock.now_ms();
        let mut inner = self.inner.write().await;

        let matching: Vec<String> = inner
            .entries
            .keys()
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .collect();

        let mut removed = 0;
        for key in matching {
            if let Some(entry) = inner.entries.remove(&key) {
                if !entry.is_expired_at(now) {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    // == TTL ==
    async fn ttl(&self, key: &str) -> Result<KeyTtl> {
        let now = self.clock.now_ms();
        let inner = self.inner.read().await;

        Ok(match inner.entries.get(key) {
            Some(entry) if entry.is_expired_at(now) => KeyTtl::Missing,
            Some(entry) => entry
                .ttl_remaining_at(now)
                .map_or(KeyTtl::Persistent, KeyTtl::Expires),
            None => KeyTtl::Missing,
        })
    }

    // == Stats ==
    async fn stats(&self) -> Result<StoreStats> {
        Ok(self.inner.read().await.stats)
    }
}
