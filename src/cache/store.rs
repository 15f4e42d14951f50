//! Store Client Module
//!
//! The contract every cache store implementation honours. Components receive a
//! shared `Arc<dyn CacheBackend>` built once at startup.

use async_trait::async_trait;
use serde::Serialize;

use crate::cache::StoreStats;
use crate::error::Result;

// == Key TTL ==
/// Remaining lifetime of a key, mirroring the Redis `TTL` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "seconds", rename_all = "snake_case")]
pub enum KeyTtl {
    /// Key does not exist (`-2`)
    Missing,
    /// Key exists without an expiry (`-1`)
    Persistent,
    /// Key expires in this many seconds
    Expires(u64),
}

impl KeyTtl {
    /// Interprets a raw Redis `TTL` reply.
    pub fn from_reply(reply: i64) -> Self {
        match reply {
            -1 => KeyTtl::Persistent,
            n if n < 0 => KeyTtl::Missing,
            n => KeyTtl::Expires(n as u64),
        }
    }
}

// == Cache Backend ==
/// Key-value cache store shared by every caching component.
///
/// Implementations surface unreachable-store failures as
/// [`AppError::CacheUnavailable`](crate::error::AppError::CacheUnavailable).
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the live value under `key`, or None if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` for `ttl_secs`, replacing any existing entry.
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;

    /// Removes `key`. Returns whether it existed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Removes every key matching the glob `pattern`. Returns how many went.
    async fn delete_matching(&self, pattern: &str) -> Result<usize>;

    /// Remaining lifetime of `key`.
    async fn ttl(&self, key: &str) -> Result<KeyTtl>;

    /// Lifetime keyspace hit/miss counters of the store.
    async fn stats(&self) -> Result<StoreStats>;
}
