//! Cache Module
//!
//! Provides a fault-tolerant client for a Redis-compatible key-value store.

mod client;
mod stats;

#[cfg(test)]
mod fake_store;

// Re-export public types
pub use client::CacheClient;
pub use stats::CacheStats;

// == Public Constants ==
/// Payload sent with PING by the liveness probe; the store must echo it back.
pub const LIVENESS_PROBE: &str = "hello";
