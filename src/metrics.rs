//! Cache Metrics
//!
//! Hit and miss ratios computed from the store's lifetime keyspace counters.
//! The counters cover every client of the store, not just this service.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::cache::{CacheBackend, StoreStats};
use crate::error::Result;

// == Cache Metrics ==
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheMetrics {
    pub keyspace_hits: u64,
    pub keyspace_misses: u64,
    /// Percentage of lookups that hit, rounded to 2 decimals
    pub hit_ratio: f64,
    /// Percentage of lookups that missed, rounded to 2 decimals
    pub miss_ratio: f64,
    pub total_operations: u64,
}

impl CacheMetrics {
    /// Derives the ratios; both are 0.0 when nothing has been looked up yet.
    pub fn from_stats(stats: StoreStats) -> Self {
        let hits = stats.keyspace_hits;
        let misses = stats.keyspace_misses;
        let total = hits.saturating_add(misses);

        let (hit_ratio, miss_ratio) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                round2(hits as f64 / total as f64 * 100.0),
                round2(misses as f64 / total as f64 * 100.0),
            )
        };

        Self {
            keyspace_hits: hits,
            keyspace_misses: misses,
            hit_ratio,
            miss_ratio,
            total_operations: total,
        }
    }

    pub fn performance_band(&self) -> PerformanceBand {
        PerformanceBand::classify(self.hit_ratio)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// == Performance Band ==
/// Advisory reading of a hit ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PerformanceBand {
    pub fn classify(hit_ratio: f64) -> Self {
        if hit_ratio >= 90.0 {
            PerformanceBand::Excellent
        } else if hit_ratio >= 80.0 {
            PerformanceBand::Good
        } else if hit_ratio >= 70.0 {
            PerformanceBand::Fair
        } else {
            PerformanceBand::Poor
        }
    }
}

impl fmt::Display for PerformanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PerformanceBand::Excellent => "excellent",
            PerformanceBand::Good => "good",
            PerformanceBand::Fair => "fair",
            PerformanceBand::Poor => "poor",
        };
        f.write_str(label)
    }
}

/// Reads the store's counters and derives the ratios. Read-only.
pub async fn get_cache_metrics(store: &dyn CacheBackend) -> Result<CacheMetrics> {
    let metrics = CacheMetrics::from_stats(store.stats().await?);

    info!(
        hits = metrics.keyspace_hits,
        misses = metrics.keyspace_misses,
        total = metrics.total_operations,
        hit_ratio = metrics.hit_ratio,
        "Cache metrics: {} performance",
        metrics.performance_band()
    );
    Ok(metrics)
}
