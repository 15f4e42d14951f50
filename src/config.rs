//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Which cache store implementation the server talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackendKind {
    /// Shared Redis process reached over the network
    Redis,
    /// In-process store, for local runs without Redis
    Memory,
}

impl CacheBackendKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Some(Self::Redis),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Cache store implementation
    pub cache_backend: CacheBackendKind,
    /// Redis connection URL
    pub redis_url: String,
    /// TTL in seconds of cached `GET /properties/` responses
    pub response_cache_ttl: u64,
    /// Glob pattern matching response-cache keys evicted on mutation
    pub invalidation_pattern: String,
    /// Memory-store expired-entry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Insert a handful of demo listings at startup
    pub seed_listings: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `REDIS_URL` - Redis URL (default: redis://127.0.0.1:6379/1)
    /// - `RESPONSE_CACHE_TTL` - Response cache TTL in seconds (default: 900)
    /// - `INVALIDATION_PATTERN` - Response-cache key pattern (default: *views.decorators.cache.cache_page*)
    /// - `CLEANUP_INTERVAL` - Memory-store sweep frequency in seconds (default: 1)
    /// - `SEED_LISTINGS` - Seed demo listings (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cache_backend: env::var("CACHE_BACKEND")
                .ok()
                .and_then(|v| CacheBackendKind::parse(&v))
                .unwrap_or(defaults.cache_backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            response_cache_ttl: env::var("RESPONSE_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.response_cache_ttl),
            invalidation_pattern: env::var("INVALIDATION_PATTERN")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.invalidation_pattern),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
            seed_listings: env::var("SEED_LISTINGS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.seed_listings),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_backend: CacheBackendKind::Redis,
            redis_url: "redis://127.0.0.1:6379/1".to_string(),
            response_cache_ttl: 900,
            invalidation_pattern: "*views.decorators.cache.cache_page*".to_string(),
            cleanup_interval: 1,
            seed_listings: true,
        }
    }
}
