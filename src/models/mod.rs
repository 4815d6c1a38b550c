//! Response models for the health probe
//!
//! This module defines the DTOs serialized into HTTP response bodies.

pub mod responses;

pub use responses::HealthResponse;
