//! Listing Cache - property listings backend with layered caching
//!
//! Serves property listings through a response cache and a cache-aside
//! queryset cache backed by Redis, invalidated whenever a listing changes.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod listings;
pub mod metrics;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{AppError, Result};
pub use metrics::{get_cache_metrics, CacheMetrics};
pub use tasks::spawn_cleanup_task;
