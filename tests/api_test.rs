//! HTTP-level tests for the health probe and the WebSocket handshake.
//!
//! The health probe is exercised in-process; the WebSocket tests run
//! against a real listener because the upgrade needs a live TCP
//! connection.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tower::ServiceExt;

use parlor_auth::jwt::{JwtDecoder, JwtEncoder};
use parlor_cache::memory::MemoryCacheProvider;
use parlor_cache::provider::CacheManager;
use parlor_core::config::auth::AuthConfig;
use parlor_core::config::cache::MemoryCacheConfig;
use parlor_core::config::{AppConfig, ServerConfig};
use parlor_realtime::connection::authenticator::ConnectionAuthenticator;
use parlor_realtime::server::RealtimeEngine;

fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".to_string(),
        access_ttl_minutes: 15,
        access_cookie_name: "accessToken".to_string(),
    }
}

fn test_app() -> Router {
    let auth = auth_config();
    let config = AppConfig {
        server: ServerConfig::default(),
        cache: Default::default(),
        auth: auth.clone(),
        realtime: Default::default(),
        logging: Default::default(),
    };

    let provider = MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 1000 }, 300);
    let cache = Arc::new(CacheManager::from_provider(Arc::new(provider)));

    let decoder = Arc::new(JwtDecoder::new(&auth));
    let authenticator = Arc::new(ConnectionAuthenticator::new(decoder, &auth));
    let engine = Arc::new(RealtimeEngine::new(
        config.realtime.clone(),
        Arc::clone(&cache),
        None,
    ));

    parlor_api::build_router(parlor_api::AppState {
        config: Arc::new(config),
        cache,
        authenticator,
        engine,
    })
}

/// Serves the app on an ephemeral port and returns its ws:// URL.
async fn spawn_app() -> String {
    let app = test_app();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("ws://{addr}/ws")
}

fn ws_request(
    url: &str,
    cookie: Option<&str>,
) -> tokio_tungstenite::tungstenite::handshake::client::Request {
    let mut request = url.into_client_request().unwrap();
    if let Some(cookie) = cookie {
        request
            .headers_mut()
            .insert("Cookie", cookie.parse().unwrap());
    }
    request
}

fn cookie_for(user_id: &str) -> String {
    let token = JwtEncoder::new(&auth_config())
        .issue_access_token(user_id)
        .unwrap();
    format!("accessToken={token}")
}

/// Reads frames until one matching `predicate` arrives.
async fn wait_for_event<S>(
    ws: &mut S,
    predicate: impl Fn(&serde_json::Value) -> bool,
) -> serde_json::Value
where
    S: StreamExt<Item = Result<Message, WsError>> + Unpin,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(Ok(msg)) = ws.next().await {
            if let Message::Text(text) = msg {
                let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
                if predicate(&value) {
                    return value;
                }
            }
        }
        panic!("WebSocket closed before the expected event arrived");
    })
    .await
    .expect("Timed out waiting for event")
}

#[tokio::test]
async fn health_check_reports_ok() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cache"], "connected");
    assert_eq!(body["connections"], 0);
    assert_eq!(body["users"], 0);
}

#[tokio::test]
async fn ws_handshake_without_credential_is_rejected() {
    let url = spawn_app().await;

    let result = connect_async(ws_request(&url, None)).await;
    match result {
        Err(WsError::Http(response)) => {
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
        other => panic!("Expected HTTP 401 rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn ws_handshake_with_garbage_token_is_rejected() {
    let url = spawn_app().await;

    let result = connect_async(ws_request(&url, Some("accessToken=not-a-jwt"))).await;
    match result {
        Err(WsError::Http(response)) => {
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
        other => panic!("Expected HTTP 401 rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn admitted_client_receives_online_users() {
    let url = spawn_app().await;
    let cookie = cookie_for("u1");

    let (mut ws, _) = connect_async(ws_request(&url, Some(&cookie)))
        .await
        .expect("Handshake should succeed");

    let event = wait_for_event(&mut ws, |v| v["event"] == "online:users").await;
    let users = event["data"].as_array().unwrap();
    assert!(users.iter().any(|u| u == "u1"));
}

#[tokio::test]
async fn join_request_is_acked() {
    let url = spawn_app().await;
    let cookie = cookie_for("u1");

    let (mut ws, _) = connect_async(ws_request(&url, Some(&cookie)))
        .await
        .expect("Handshake should succeed");

    ws.send(Message::Text(
        serde_json::json!({"event": "chat:join", "data": {"chatId": "c1"}})
            .to_string()
            .into(),
    ))
    .await
    .unwrap();

    let ack = wait_for_event(&mut ws, |v| v["event"] == "chat:join:ack").await;
    assert_eq!(ack["data"]["chatId"], "c1");
    assert_eq!(ack["data"]["ok"], true);
}

#[tokio::test]
async fn malformed_frame_gets_error_event_and_connection_survives() {
    let url = spawn_app().await;
    let cookie = cookie_for("u1");

    let (mut ws, _) = connect_async(ws_request(&url, Some(&cookie)))
        .await
        .expect("Handshake should succeed");

    ws.send(Message::Text("{not json".to_string().into()))
        .await
        .unwrap();

    let error = wait_for_event(&mut ws, |v| v["event"] == "error").await;
    assert_eq!(error["data"]["code"], "BAD_EVENT");

    // A valid frame still works afterwards.
    ws.send(Message::Text(
        serde_json::json!({"event": "chat:join", "data": {"chatId": "c2"}})
            .to_string()
            .into(),
    ))
    .await
    .unwrap();
    let ack = wait_for_event(&mut ws, |v| v["event"] == "chat:join:ack").await;
    assert_eq!(ack["data"]["ok"], true);
}
