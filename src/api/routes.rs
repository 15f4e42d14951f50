//! API Routes
//!
//! Configures the Axum router with all listings endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_metrics_handler, cache_status_handler, clear_cache_handler, create_property_handler,
    delete_property_handler, health_handler, list_properties_handler, update_property_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /properties/` - List listings (response-cached)
/// - `POST /properties/` - Create a listing
/// - `PUT /properties/:id` - Update a listing
/// - `DELETE /properties/:id` - Delete a listing
/// - `GET /cache/metrics` - Keyspace hit/miss ratios
/// - `GET /cache/status` - Queryset cache state
/// - `DELETE /cache` - Clear listing caches
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/properties/",
            get(list_properties_handler).post(create_property_handler),
        )
        .route(
            "/properties",
            get(list_properties_handler).post(create_property_handler),
        )
        .route(
            "/properties/:id",
            put(update_property_handler).delete(delete_property_handler),
        )
        .route("/cache/metrics", get(cache_metrics_handler))
        .route("/cache/status", get(cache_status_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    async fn create_test_app() -> Router {
        let state = AppState::new(Arc::new(MemoryStore::new()), &Config::default()).await;
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_listing_endpoint() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/properties/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_update_unknown_listing() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/properties/42")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title":"New"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/cache/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
