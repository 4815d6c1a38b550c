//! Response DTOs for the health probe
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Whether the cache store answered the liveness probe
    pub cache_ready: bool,
    /// Cache client counters
    pub cache: CacheStats,
    /// Fraction of lookups that found a value
    pub hit_rate: f64,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a healthy response with current timestamp
    pub fn healthy(cache: CacheStats) -> Self {
        Self {
            status: "healthy".to_string(),
            cache_ready: true,
            hit_rate: cache.hit_rate(),
            cache,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
