//! Application state shared across all handlers.

use std::sync::Arc;

use parlor_cache::provider::CacheManager;
use parlor_core::config::AppConfig;
use parlor_realtime::connection::authenticator::ConnectionAuthenticator;
use parlor_realtime::server::RealtimeEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Cache manager (Redis or in-memory); also the presence store backend
    pub cache: Arc<CacheManager>,
    /// Handshake credential verifier
    pub authenticator: Arc<ConnectionAuthenticator>,
    /// WebSocket realtime engine
    pub engine: Arc<RealtimeEngine>,
}
