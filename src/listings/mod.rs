//! Listings Module
//!
//! Listing records, the repository that owns them, and cached read access.

mod accessor;
mod model;
mod repository;

pub use accessor::{CacheInfo, CachedProperties, ALL_PROPERTIES_KEY, ALL_PROPERTIES_TTL};
pub use model::{
    demo_listings, MutationEvent, MutationKind, NewProperty, Property, PropertyUpdate,
};
pub use repository::{MutationListener, PropertyRepository, PropertySource};
