//! API Handlers
//!
//! Application state and the health probe handler.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::cache::CacheClient;
use crate::config::Config;
use crate::error::Result;
use crate::models::HealthResponse;

/// Application state shared across all handlers.
///
/// Owns the cache client; consumers receive it from here instead of a global.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache client
    pub cache: Arc<CacheClient>,
}

impl AppState {
    /// Creates a new AppState around an existing cache client.
    pub fn new(cache: CacheClient) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Connects the cache client with the configured host and port.
    pub async fn from_config(config: &Config) -> Self {
        Self::new(CacheClient::connect(config.cache.clone()).await)
    }
}

/// Handler for GET /health
///
/// Returns 200 when the cache store answers the liveness probe, 503 otherwise.
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    state.cache.check().await?;

    Ok(Json(HealthResponse::healthy(state.cache.stats())))
}
