//! Parlor server — real-time presence and chat fanout.
//!
//! Entry point that wires the crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use parlor_auth::jwt::JwtDecoder;
use parlor_cache::provider::CacheManager;
use parlor_core::config::AppConfig;
use parlor_core::error::AppError;
use parlor_realtime::connection::authenticator::ConnectionAuthenticator;
use parlor_realtime::server::RealtimeEngine;

#[tokio::main]
async fn main() {
    let env = std::env::var("PARLOR_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Parlor v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(provider = %config.cache.provider, "Initializing cache");
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    let decoder = Arc::new(JwtDecoder::new(&config.auth));
    let authenticator = Arc::new(ConnectionAuthenticator::new(decoder, &config.auth));

    let bridge = build_bridge(&config)?;
    let engine = Arc::new(RealtimeEngine::new(
        config.realtime.clone(),
        Arc::clone(&cache),
        bridge,
    ));

    let app_state = parlor_api::state::AppState {
        config: Arc::new(config.clone()),
        cache,
        authenticator,
        engine: Arc::clone(&engine),
    };

    let app = parlor_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Parlor server listening on {addr}");

    // The engine shuts down inside the graceful-shutdown future:
    // axum waits for open connections to drain, and the WebSocket
    // handlers only exit once the engine closes their sessions.
    let engine_for_shutdown = Arc::clone(&engine);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            engine_for_shutdown.shutdown().await;
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Parlor server shut down gracefully");
    Ok(())
}

#[cfg(feature = "redis-pubsub")]
fn build_bridge(
    config: &AppConfig,
) -> Result<Option<Arc<parlor_realtime::bridge::RedisPubSubBridge>>, AppError> {
    let bridge = parlor_realtime::bridge::RedisPubSubBridge::new(&config.cache.redis.url)?;
    Ok(Some(Arc::new(bridge)))
}

#[cfg(not(feature = "redis-pubsub"))]
fn build_bridge(
    _config: &AppConfig,
) -> Result<Option<Arc<parlor_realtime::bridge::RedisPubSubBridge>>, AppError> {
    Ok(None)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => {
                tracing::error!("Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
