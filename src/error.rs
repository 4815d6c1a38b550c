//! Error types for the application
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Failures inside the cache client.
///
/// Only `CacheClient::check` hands these to callers; every other operation
/// swallows them and degrades to a no-op or the absent-marker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Could not open a connection to the store
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    /// No connection handle is held
    #[error("Not connected to cache store")]
    Disconnected,

    /// Liveness probe was answered with something other than the echo
    #[error("Liveness probe mismatch: got {0:?}")]
    ProbeMismatch(String),

    /// Store command failed (timeout, protocol or I/O error)
    #[error("Operation failure: {0}")]
    OperationFailure(String),

    /// Expiry must be at least one second
    #[error("Expiry must be at least one second")]
    InvalidTtl,
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::OperationFailure(err.to_string())
    }
}

// == App Error Enum ==
/// Errors surfaced by the application shell (HTTP probe, job dispatch).
#[derive(Error, Debug)]
pub enum AppError {
    /// Cache store is not usable
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(#[from] CacheError),

    /// No job registered under the requested name
    #[error("Unknown job: {0}")]
    UnknownJob(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::CacheUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::UnknownJob(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Aliases ==
/// Result type of cache client internals.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Convenience Result type for the application shell.
pub type Result<T> = std::result::Result<T, AppError>;
