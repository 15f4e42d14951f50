//! Response DTOs for the listings API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::invalidation::InvalidationReport;
use crate::listings::Property;
use crate::metrics::{CacheMetrics, PerformanceBand};

/// Response body for the listing endpoint (GET /properties/)
#[derive(Debug, Clone, Serialize)]
pub struct PropertyListResponse {
    pub properties: Vec<Property>,
    pub count: usize,
}

impl PropertyListResponse {
    pub fn new(properties: Vec<Property>) -> Self {
        Self {
            count: properties.len(),
            properties,
        }
    }
}

/// Response body for the DELETE operation (DELETE /properties/:id)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The listing that was deleted
    pub id: u64,
}

impl DeleteResponse {
    pub fn new(id: u64) -> Self {
        Self {
            message: format!("Property {} deleted successfully", id),
            id,
        }
    }
}

/// Response body for the metrics endpoint (GET /cache/metrics)
#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    #[serde(flatten)]
    pub metrics: CacheMetrics,
    pub performance: PerformanceBand,
}

impl From<CacheMetrics> for MetricsResponse {
    fn from(metrics: CacheMetrics) -> Self {
        Self {
            performance: metrics.performance_band(),
            metrics,
        }
    }
}

/// Response body for clearing the caches (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: InvalidationReport,
}

impl ClearCacheResponse {
    pub fn new(report: InvalidationReport) -> Self {
        Self {
            message: "Property caches cleared".to_string(),
            report,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StoreStats;

    #[test]
    fn test_list_response_counts() {
        let resp = PropertyListResponse::new(Vec::new());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json["properties"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_metrics_response_is_flat() {
        let resp = MetricsResponse::from(CacheMetrics::from_stats(StoreStats::new(9, 1)));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["hit_ratio"], 90.0);
        assert_eq!(json["total_operations"], 10);
        assert_eq!(json["performance"], "excellent");
    }

    #[test]
    fn test_clear_response_serialize() {
        let resp = ClearCacheResponse::new(InvalidationReport {
            queryset_cleared: true,
            responses_cleared: 3,
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["queryset_cleared"], true);
        assert_eq!(json["responses_cleared"], 3);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
