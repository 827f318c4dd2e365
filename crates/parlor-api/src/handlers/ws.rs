//! WebSocket upgrade handler.
//!
//! Authentication happens before the upgrade completes: the access
//! token travels in the handshake's `Cookie` header, and a rejected
//! credential terminates the handshake with 401 before any presence
//! state is written.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use parlor_realtime::connection::session::ConnectionSession;
use parlor_realtime::message::types::{InboundEvent, OutboundEvent};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /ws — WebSocket upgrade
pub async fn ws_upgrade(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let cookie_header = headers.get(COOKIE).and_then(|v| v.to_str().ok());
    let admitted = state.authenticator.authenticate(cookie_header)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(state, admitted.user_id, socket)))
}

/// Drives an established WebSocket connection to completion.
async fn handle_socket(state: AppState, user_id: String, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (session, mut outbound_rx) = state.engine.connect(&user_id).await;
    let conn_id = session.connection_id();

    info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connection established");

    // Forward engine events out over the socket.
    let outbound_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize outbound event");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // The closed branch fires on administrative closes (engine
    // shutdown, send failure), so an idle socket tears down too.
    loop {
        tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => handle_inbound(&session, text.as_str()),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            },
            () = session.closed() => break,
        }
    }

    outbound_task.abort();
    session.close().await;

    info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connection closed");
}

/// Dispatches one inbound frame.
///
/// A malformed frame gets an `error` event back; it never tears down
/// the connection.
fn handle_inbound(session: &ConnectionSession, text: &str) {
    let event = match serde_json::from_str::<InboundEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            debug!(conn_id = %session.connection_id(), error = %e, "Unparseable inbound frame");
            session.send(OutboundEvent::Error {
                code: "BAD_EVENT".to_string(),
                message: "Unrecognized or malformed event".to_string(),
            });
            return;
        }
    };

    match event {
        InboundEvent::ChatJoin { chat_id } => {
            let ack = match session.join_room(&chat_id) {
                Ok(()) => OutboundEvent::JoinAck {
                    chat_id,
                    ok: true,
                    error: None,
                },
                Err(e) => OutboundEvent::JoinAck {
                    chat_id,
                    ok: false,
                    error: Some(e.message.clone()),
                },
            };
            session.send(ack);
        }
        InboundEvent::ChatLeave { chat_id } => {
            session.leave_room(&chat_id);
        }
    }
}
