//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Readiness: Probes the cache store and reconnects it after failures

mod readiness;

pub use readiness::spawn_readiness_task;
