//! Cache Statistics Module
//!
//! Tracks client-side outcomes: hits, misses, swallowed failures and reconnects.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache client metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of GETs that returned a value
    pub hits: u64,
    /// Number of GETs that found no value
    pub misses: u64,
    /// Number of operations whose store failure was swallowed
    pub degraded: u64,
    /// Number of successful reconnects performed by `ready()`
    pub reconnects: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    /// Degraded lookups are not counted.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_degraded(&mut self) {
        self.degraded += 1;
    }

    pub fn record_reconnect(&mut self) {
        self.reconnects += 1;
    }
}
