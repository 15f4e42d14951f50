//! Cache-aside access to the full listing.
//!
//! Misses are not deduplicated: two callers missing at the same time both
//! query the repository and both write the key. A miss that read the rows
//! before a concurrent mutation can write after that mutation's invalidation,
//! leaving a stale listing cached for up to the TTL.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::cache::{CacheBackend, KeyTtl};
use crate::error::Result;
use crate::listings::{Property, PropertySource};

/// Key under which the full listing is cached.
pub const ALL_PROPERTIES_KEY: &str = "all_properties";

/// Lifetime of the cached listing in seconds.
pub const ALL_PROPERTIES_TTL: u64 = 3600;

/// Snapshot of the queryset cache state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheInfo {
    pub cache_key: &'static str,
    pub is_cached: bool,
    pub cached_count: usize,
    pub ttl_remaining: KeyTtl,
}

/// Cache-aside reader over the full listing.
pub struct CachedProperties {
    store: Arc<dyn CacheBackend>,
    source: Arc<dyn PropertySource>,
}

impl CachedProperties {
    /// Creates an accessor caching `source` reads in `store`.
    pub fn new(store: Arc<dyn CacheBackend>, source: Arc<dyn PropertySource>) -> Self {
        Self { store, source }
    }

    /// Returns every listing, from the cache when present.
    ///
    /// # Errors
    /// `CacheUnavailable` when the store cannot be read. A failed write after
    /// a successful repository read is only logged.
    pub async fn get_all_properties(&self) -> Result<Vec<Property>> {
        if let Some(raw) = self.store.get(ALL_PROPERTIES_KEY).await? {
            match serde_json::from_str::<Vec<Property>>(&raw) {
                Ok(properties) => {
                    info!("Cache HIT: retrieved {} properties", properties.len());
                    return Ok(properties);
                }
                Err(err) => warn!(error = %err, "discarding undecodable cached listing"),
            }
        }

        info!("Cache MISS: fetching properties from the repository");
        let properties = self.source.list_all().await?;
        let raw = serde_json::to_string(&properties)?;

        match self
            .store
            .set(ALL_PROPERTIES_KEY, &raw, ALL_PROPERTIES_TTL)
            .await
        {
            Ok(()) => info!(
                "Cache SET: stored {} properties for {}s",
                properties.len(),
                ALL_PROPERTIES_TTL
            ),
            Err(err) => warn!(error = %err, "could not cache the listing"),
        }

        Ok(properties)
    }

    /// Removes the cached listing. Returns whether it was cached.
    pub async fn invalidate(&self) -> Result<bool> {
        let removed = self.store.delete(ALL_PROPERTIES_KEY).await?;
        info!("Cache INVALIDATED: properties cache cleared");
        Ok(removed)
    }

    pub async fn cache_info(&self) -> Result<CacheInfo> {
        let cached = self.store.get(ALL_PROPERTIES_KEY).await?;
        let cached_count = cached
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<Property>>(raw).ok())
            .map_or(0, |properties| properties.len());

        Ok(CacheInfo {
            cache_key: ALL_PROPERTIES_KEY,
            is_cached: cached.is_some(),
            cached_count,
            ttl_remaining: self.store.ttl(ALL_PROPERTIES_KEY).await?,
        })
    }
}
