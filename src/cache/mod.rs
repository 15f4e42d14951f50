//! Cache Module
//!
//! The Store Client: a key-value contract with TTL expiry, pattern deletion
//! and keyspace statistics, implemented over Redis and in process.

mod clock;
mod entry;
mod memory;
mod pattern;
mod redis_store;
mod stats;
mod store;

#[cfg(test)]
pub(crate) mod testing;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use memory::MemoryStore;
pub use pattern::glob_match;
pub use redis_store::{decode_value, stats_from_info, RedisStore};
pub use stats::StoreStats;
pub use store::{CacheBackend, KeyTtl};
