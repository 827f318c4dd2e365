//! Health check handler.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use parlor_core::traits::cache::CacheProvider;

use crate::state::AppState;

/// Health probe response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Whether the cache / presence-store backend is reachable.
    pub cache: &'static str,
    /// Connections held by this process.
    pub connections: usize,
    /// Distinct users among those connections (multi-tab counts once).
    pub users: usize,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = match state.cache.health_check().await {
        Ok(true) => "connected",
        _ => "unavailable",
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        cache,
        connections: state.engine.connection_count(),
        users: state.engine.user_count(),
    })
}
