//! API Module
//!
//! HTTP handlers and routing for the listings REST API.
//!
//! # Endpoints
//! - `GET /properties/` - List listings, response-cached
//! - `POST /properties/` - Create a listing
//! - `PUT /properties/:id` - Update a listing
//! - `DELETE /properties/:id` - Delete a listing
//! - `GET /cache/metrics` - Cache hit/miss metrics
//! - `GET /cache/status` - Queryset cache state
//! - `DELETE /cache` - Clear listing caches
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod response_cache;
pub mod routes;

pub use handlers::*;
pub use response_cache::{ResponseCache, RESPONSE_CACHE_PREFIX};
pub use routes::create_router;
