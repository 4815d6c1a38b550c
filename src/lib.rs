//! App Skeleton - Application shell around a fault-tolerant cache client
//!
//! Provides a Redis-backed cache client with explicit readiness checks,
//! environment-driven configuration and command-line job dispatch.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod jobs;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::CacheClient;
pub use config::{CacheConfig, Config};
pub use jobs::JobRegistry;
pub use tasks::spawn_readiness_task;
