//! API Module
//!
//! Operational HTTP surface of the application.
//!
//! # Endpoints
//! - `GET /health` - Health check reporting cache readiness

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
