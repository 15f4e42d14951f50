//! API Handlers
//!
//! HTTP request handlers for each listings endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::api::ResponseCache;
use crate::cache::CacheBackend;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::invalidation::CacheInvalidator;
use crate::listings::{CacheInfo, CachedProperties, Property, PropertyRepository, PropertySource};
use crate::metrics::get_cache_metrics;
use crate::models::{
    ClearCacheResponse, CreatePropertyRequest, DeleteResponse, HealthResponse, MetricsResponse,
    PropertyListResponse, UpdatePropertyRequest,
};

/// Header telling clients whether the body came from the response cache.
pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");

/// Application state shared across all handlers.
///
/// Every component holds the same store handle, created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CacheBackend>,
    pub repository: Arc<PropertyRepository>,
    pub properties: Arc<CachedProperties>,
    pub invalidator: Arc<CacheInvalidator>,
    pub response_cache: ResponseCache,
}

impl AppState {
    /// Wires the repository, caches and invalidation hook around `store`.
    pub async fn new(store: Arc<dyn CacheBackend>, config: &Config) -> Self {
        let repository = Arc::new(PropertyRepository::new());
        let properties = Arc::new(CachedProperties::new(store.clone(), repository.clone()));
        let invalidator = Arc::new(CacheInvalidator::new(
            store.clone(),
            config.invalidation_pattern.clone(),
        ));
        repository.subscribe(invalidator.clone()).await;

        Self {
            response_cache: ResponseCache::new(store.clone(), config.response_cache_ttl),
            store,
            repository,
            properties,
            invalidator,
        }
    }
}

fn cached_json(body: String, cache_status: &'static str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/json"),
            (CACHE_STATUS_HEADER, cache_status),
        ],
        body,
    )
        .into_response()
}

/// Handler for GET /properties/
///
/// Serves the cached response when present. Otherwise reads through the
/// queryset cache, falling back to the repository if the store is down.
pub async fn list_properties_handler(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    let key = ResponseCache::key_for(&uri);
    if let Some(body) = state.response_cache.lookup(&key).await {
        return Ok(cached_json(body, "HIT"));
    }

    let properties = match state.properties.get_all_properties().await {
        Ok(properties) => properties,
        Err(err) if err.is_cache_unavailable() => {
            warn!(error = %err, "cache unavailable, serving listings uncached");
            state.repository.list_all().await?
        }
        Err(err) => return Err(err),
    };

    let body = serde_json::to_string(&PropertyListResponse::new(properties))?;
    state.response_cache.store(&key, &body).await;

    Ok(cached_json(body, "MISS"))
}

/// Handler for POST /properties/
pub async fn create_property_handler(
    State(state): State<AppState>,
    Json(req): Json<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<Property>)> {
    let new = req.into_new_property().map_err(AppError::InvalidRequest)?;
    let property = state.repository.create(new).await?;

    Ok((StatusCode::CREATED, Json(property)))
}

/// Handler for PUT /properties/:id
pub async fn update_property_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdatePropertyRequest>,
) -> Result<Json<Property>> {
    let update = req.into_update().map_err(AppError::InvalidRequest)?;
    let property = state.repository.update(id, update).await?;

    Ok(Json(property))
}

/// Handler for DELETE /properties/:id
pub async fn delete_property_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>> {
    state.repository.delete(id).await?;

    Ok(Json(DeleteResponse::new(id)))
}

/// Handler for GET /cache/metrics
pub async fn cache_metrics_handler(State(state): State<AppState>) -> Result<Json<MetricsResponse>> {
    let metrics = get_cache_metrics(state.store.as_ref()).await?;

    Ok(Json(metrics.into()))
}

/// Handler for GET /cache/status
pub async fn cache_status_handler(State(state): State<AppState>) -> Result<Json<CacheInfo>> {
    Ok(Json(state.properties.cache_info().await?))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(
    State(state): State<AppState>,
) -> Result<Json<ClearCacheResponse>> {
    let report = state.invalidator.clear_all().await?;

    Ok(Json(ClearCacheResponse::new(report)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
