//! Cache Invalidation
//!
//! Evicts the queryset cache and the cached listing responses whenever a
//! listing changes. Subscribed to the repository, so it only ever runs after
//! the mutation has been committed.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::CacheBackend;
use crate::error::Result;
use crate::listings::{MutationEvent, MutationListener, ALL_PROPERTIES_KEY};

/// What an explicit clear removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvalidationReport {
    /// Whether the queryset key was present
    pub queryset_cleared: bool,
    /// Number of response-cache keys removed
    pub responses_cleared: usize,
}

/// Mutation listener that evicts the cached listing and its responses.
pub struct CacheInvalidator {
    store: Arc<dyn CacheBackend>,
    response_pattern: String,
}

impl CacheInvalidator {
    /// `response_pattern` is the glob matching response-cache keys.
    pub fn new(store: Arc<dyn CacheBackend>, response_pattern: impl Into<String>) -> Self {
        Self {
            store,
            response_pattern: response_pattern.into(),
        }
    }

    /// Clears every listing-related cache entry, reporting store failures.
    pub async fn clear_all(&self) -> Result<InvalidationReport> {
        let queryset_cleared = self.store.delete(ALL_PROPERTIES_KEY).await?;
        let responses_cleared = self.store.delete_matching(&self.response_pattern).await?;

        info!(
            queryset_cleared,
            responses_cleared, "Cleared all property caches"
        );
        Ok(InvalidationReport {
            queryset_cleared,
            responses_cleared,
        })
    }
}

#[async_trait]
impl MutationListener for CacheInvalidator {
    /// Best-effort: the mutation already succeeded and TTL expiry still bounds
    /// staleness, so store failures are logged and swallowed.
    async fn on_mutation(&self, event: &MutationEvent) {
        if let Err(err) = self.store.delete(ALL_PROPERTIES_KEY).await {
            warn!(error = %err, key = ALL_PROPERTIES_KEY, "Could not clear queryset cache");
        }

        let pattern = self.response_pattern.as_str();
        match self.store.delete_matching(pattern).await {
            Ok(removed) => debug!(removed, pattern, "cleared response cache"),
            Err(err) => warn!(error = %err, pattern, "Could not clear view cache"),
        }

        info!(
            "Cache invalidated: property '{}' was {}",
            event.property.title, event.kind
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::UnreachableStore;
    use crate::cache::MemoryStore;
    use crate::listings::{
        CachedProperties, NewProperty, PropertyRepository, PropertySource, PropertyUpdate,
    };

    const PATTERN: &str = "*views.decorators.cache.cache_page*";
    const RESPONSE_KEY: &str = "views.decorators.cache.cache_page./properties/";

    fn listing(title: &str) -> NewProperty {
        NewProperty {
            title: title.to_string(),
            description: "d".to_string(),
            price: "10.00".to_string(),
            location: "Turin".to_string(),
        }
    }

    async fn wired() -> (Arc<MemoryStore>, Arc<PropertyRepository>, CachedProperties) {
        let store = Arc::new(MemoryStore::new());
        let repository = Arc::new(PropertyRepository::new());
        repository
            .subscribe(Arc::new(CacheInvalidator::new(store.clone(), PATTERN)))
            .await;
        let cached = CachedProperties::new(store.clone(), repository.clone());
        (store, repository, cached)
    }

    #[tokio::test]
    async fn test_every_mutation_kind_evicts_both_layers() {
        let (store, repository, cached) = wired().await;
        let created = repository.create(listing("Loft")).await.unwrap();

        // update
        cached.get_all_properties().await.unwrap();
        store.set(RESPONSE_KEY, "{}", 900).await.unwrap();
        let reads = repository.read_count();
        repository
            .update(
                created.id,
                PropertyUpdate {
                    title: Some("Loft v2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(store.get(RESPONSE_KEY).await.unwrap().is_none());
        let after_update = cached.get_all_properties().await.unwrap();
        assert_eq!(repository.read_count(), reads + 1);
        assert_eq!(after_update[0].title, "Loft v2");

        // create
        store.set(RESPONSE_KEY, "{}", 900).await.unwrap();
        let reads = repository.read_count();
        repository.create(listing("Cottage")).await.unwrap();
        assert!(store.get(RESPONSE_KEY).await.unwrap().is_none());
        assert_eq!(cached.get_all_properties().await.unwrap().len(), 2);
        assert_eq!(repository.read_count(), reads + 1);

        // delete
        store.set(RESPONSE_KEY, "{}", 900).await.unwrap();
        let reads = repository.read_count();
        repository.delete(created.id).await.unwrap();
        assert!(store.get(RESPONSE_KEY).await.unwrap().is_none());
        assert_eq!(cached.get_all_properties().await.unwrap().len(), 1);
        assert_eq!(repository.read_count(), reads + 1);
    }

    #[tokio::test]
    async fn test_unrelated_keys_survive() {
        let (store, repository, _cached) = wired().await;
        store.set("session:42", "alive", 900).await.unwrap();

        repository.create(listing("Loft")).await.unwrap();

        assert_eq!(
            store.get("session:42").await.unwrap().as_deref(),
            Some("alive")
        );
    }

    #[tokio::test]
    async fn test_unreachable_store_does_not_fail_mutations() {
        let repository = PropertyRepository::new();
        repository
            .subscribe(Arc::new(CacheInvalidator::new(
                Arc::new(UnreachableStore),
                PATTERN,
            )))
            .await;

        let created = repository.create(listing("Loft")).await.unwrap();
        repository
            .update(created.id, PropertyUpdate::default())
            .await
            .unwrap();
        repository.delete(created.id).await.unwrap();

        assert!(repository.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_reports_and_propagates() {
        let store = Arc::new(MemoryStore::new());
        store.set(ALL_PROPERTIES_KEY, "[]", 3600).await.unwrap();
        store.set(RESPONSE_KEY, "{}", 900).await.unwrap();
        let invalidator = CacheInvalidator::new(store.clone(), PATTERN);

        let report = invalidator.clear_all().await.unwrap();
        assert_eq!(
            report,
            InvalidationReport {
                queryset_cleared: true,
                responses_cleared: 1,
            }
        );

        let down = CacheInvalidator::new(Arc::new(UnreachableStore), PATTERN);
        assert!(down.clear_all().await.unwrap_err().is_cache_unavailable());
    }
}
