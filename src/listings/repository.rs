//! Listing Repository
//!
//! In-process backing store for listings. Mutations commit under the write
//! lock, release it, and only then notify subscribed listeners, in
//! subscription order.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::listings::{MutationEvent, MutationKind, NewProperty, Property, PropertyUpdate};

// == Seams ==
/// The "list all listings" query the cache sits in front of.
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Every listing, ordered by id. Side-effect free.
    async fn list_all(&self) -> Result<Vec<Property>>;
}

/// Receives committed create/update/delete events.
#[async_trait]
pub trait MutationListener: Send + Sync {
    async fn on_mutation(&self, event: &MutationEvent);
}

// == Property Repository ==
#[derive(Default)]
pub struct PropertyRepository {
    rows: RwLock<BTreeMap<u64, Property>>,
    last_id: AtomicU64,
    listeners: RwLock<Vec<Arc<dyn MutationListener>>>,
    /// Number of `list_all` queries served
    reads: AtomicU64,
}

impl PropertyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener invoked after every committed mutation.
    pub async fn subscribe(&self, listener: Arc<dyn MutationListener>) {
        self.listeners.write().await.push(listener);
    }

    /// How many times the full listing has been queried.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    pub async fn create(&self, new: NewProperty) -> Result<Property> {
        let property = {
            let mut rows = self.rows.write().await;
            let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
            let property = Property {
                id,
                title: new.title,
                description: new.description,
                price: new.price,
                location: new.location,
                created_at: Utc::now(),
            };
            rows.insert(id, property.clone());
            property
        };

        self.notify(MutationKind::Created, &property).await;
        Ok(property)
    }

    pub async fn update(&self, id: u64, update: PropertyUpdate) -> Result<Property> {
        let property = {
            let mut rows = self.rows.write().await;
            let property = rows.get_mut(&id).ok_or_else(|| not_found(id))?;
            update.apply(property);
            property.clone()
        };

        self.notify(MutationKind::Updated, &property).await;
        Ok(property)
    }

    pub async fn delete(&self, id: u64) -> Result<Property> {
        let property = self
            .rows
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| not_found(id))?;

        self.notify(MutationKind::Deleted, &property).await;
        Ok(property)
    }

    async fn notify(&self, kind: MutationKind, property: &Property) {
        let listeners = self.listeners.read().await.clone();
        debug!(id = property.id, %kind, listeners = listeners.len(), "dispatching mutation event");

        let event = MutationEvent {
            kind,
            property: property.clone(),
        };
        for listener in listeners {
            listener.on_mutation(&event).await;
        }
    }
}

#[async_trait]
impl PropertySource for PropertyRepository {
    async fn list_all(&self) -> Result<Vec<Property>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.read().await.values().cloned().collect())
    }
}

fn not_found(id: u64) -> AppError {
    AppError::NotFound(format!("Property {} does not exist", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn listing(title: &str) -> NewProperty {
        NewProperty {
            title: title.to_string(),
            description: String::new(),
            price: "100.00".to_string(),
            location: "Oslo".to_string(),
        }
    }

    /// Records events together with the row count visible when each arrived.
    struct Recorder {
        repository: Arc<PropertyRepository>,
        seen: Mutex<Vec<(MutationKind, u64, usize)>>,
    }

    #[async_trait]
    impl MutationListener for Recorder {
        async fn on_mutation(&self, event: &MutationEvent) {
            let visible = self.repository.rows.read().await.len();
            self.seen
                .lock()
                .unwrap()
                .push((event.kind, event.property.id, visible));
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repository = PropertyRepository::new();
        let a = repository.create(listing("A")).await.unwrap();
        let b = repository.create(listing("B")).await.unwrap();

        assert_eq!((a.id, b.id), (1, 2));
        let all = repository.list_all().await.unwrap();
        assert_eq!(all, vec![a, b]);
        assert_eq!(repository.read_count(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let repository = PropertyRepository::new();

        let err = repository
            .update(9, PropertyUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(matches!(
            repository.delete(9).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_listeners_run_after_commit() {
        let repository = Arc::new(PropertyRepository::new());
        let recorder = Arc::new(Recorder {
            repository: repository.clone(),
            seen: Mutex::new(Vec::new()),
        });
        repository.subscribe(recorder.clone()).await;

        let created = repository.create(listing("A")).await.unwrap();
        repository
            .update(
                created.id,
                PropertyUpdate {
                    title: Some("A2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        repository.delete(created.id).await.unwrap();

        // the write lock is released before dispatch, and the committed
        // state is already visible to the listener
        let seen = recorder.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                (MutationKind::Created, 1, 1),
                (MutationKind::Updated, 1, 1),
                (MutationKind::Deleted, 1, 0),
            ]
        );
    }
}
