//! Store Statistics Module
//!
//! Lifetime keyspace counters reported by a cache store.

use serde::Serialize;

// == Store Stats ==
/// Keyspace lookup counters, as tracked by the store for its whole lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Lookups that found a live key
    pub keyspace_hits: u64,
    /// Lookups on a missing or expired key
    pub keyspace_misses: u64,
}

impl StoreStats {
    // == Constructor ==
    pub fn new(keyspace_hits: u64, keyspace_misses: u64) -> Self {
        Self {
            keyspace_hits,
            keyspace_misses,
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.keyspace_hits = self.keyspace_hits.saturating_add(1);
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.keyspace_misses = self.keyspace_misses.saturating_add(1);
    }
}
