//! Cache Entry Module
//!
//! Defines the structure for individual in-memory cache entries with TTL support.

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry written at `now_ms` with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Optional TTL in seconds
    /// * `now_ms` - Write time in Unix milliseconds
    pub fn new(value: String, ttl_seconds: Option<u64>, now_ms: u64) -> Self {
        let expires_at = ttl_seconds.map(|ttl| now_ms.saturating_add(ttl.saturating_mul(1000)));

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is expired once the current time reaches the expiration time,
    /// so a 10s entry written at t is readable at t+9.999 and gone at t+10.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in whole seconds, or None if no expiration is set.
    ///
    /// Rounds up so a live entry never reports 0, matching Redis `TTL`.
    pub fn ttl_remaining_at(&self, now_ms: u64) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(now_ms).div_ceil(1000))
    }
}
