//! Event router: addressing and fanout primitives for external
//! collaborators (chat/message services).
//!
//! The router is an explicitly constructed value injected wherever
//! events are emitted; there is no global transport handle. All
//! delivery is at-most-once and best-effort — no ack or retry at this
//! layer. Higher layers re-query state if they need durability.

pub mod stream;

use std::sync::Arc;

use tracing::warn;

use crate::bridge::RedisPubSubBridge;
use crate::connection::handle::ConnectionId;
use crate::connection::pool::ConnectionPool;
use crate::message::types::OutboundEvent;
use crate::presence::store::PresenceStore;
use crate::room::address::ChannelAddress;
use crate::room::registry::RoomRegistry;

pub use stream::AiStream;

/// Routes events to user and room channels.
#[derive(Debug, Clone)]
pub struct EventRouter {
    pool: Arc<ConnectionPool>,
    rooms: Arc<RoomRegistry>,
    presence: Arc<PresenceStore>,
    /// Cross-process relay; `None` in single-node deployments.
    bridge: Option<Arc<RedisPubSubBridge>>,
}

impl EventRouter {
    /// Creates a new router over the connection layer.
    pub fn new(
        pool: Arc<ConnectionPool>,
        rooms: Arc<RoomRegistry>,
        presence: Arc<PresenceStore>,
        bridge: Option<Arc<RedisPubSubBridge>>,
    ) -> Self {
        Self {
            pool,
            rooms,
            presence,
            bridge,
        }
    }

    /// Delivers an event to every connection the user has open.
    ///
    /// Silent no-op when the user is offline.
    pub async fn emit_to_user(&self, user_id: &str, event: &OutboundEvent) {
        self.deliver(&ChannelAddress::User(user_id.to_string()), event, None)
            .await;
    }

    /// Delivers an event to every member of a room.
    pub async fn emit_to_room(&self, room_id: &str, event: &OutboundEvent) {
        self.deliver(&ChannelAddress::Room(room_id.to_string()), event, None)
            .await;
    }

    /// Delivers an event to a room, excluding the sender's current
    /// connection when it can be resolved through the presence store.
    ///
    /// A sender with no live connection (e.g. a non-socket path)
    /// gets no exclusion: the whole room receives the event.
    pub async fn emit_to_room_except(
        &self,
        room_id: &str,
        sender_user_id: &str,
        event: &OutboundEvent,
    ) {
        let except = self.presence.connection_handle(sender_user_id).await;
        self.deliver(&ChannelAddress::Room(room_id.to_string()), event, except)
            .await;
    }

    /// Notifies each participant of a newly created chat.
    pub async fn emit_new_chat(&self, participant_ids: &[String], chat: serde_json::Value) {
        let event = OutboundEvent::ChatNew(chat);
        for participant_id in participant_ids {
            self.emit_to_user(participant_id, &event).await;
        }
    }

    /// Delivers a new message to a chat room, excluding the sender.
    pub async fn emit_new_message(
        &self,
        sender_user_id: &str,
        chat_id: &str,
        message: serde_json::Value,
    ) {
        let event = OutboundEvent::MessageNew(message);
        self.emit_to_room_except(chat_id, sender_user_id, &event)
            .await;
    }

    /// Pushes a chat's updated last message to each participant.
    pub async fn emit_chat_update(
        &self,
        participant_ids: &[String],
        chat_id: &str,
        last_message: serde_json::Value,
    ) {
        let event = OutboundEvent::ChatUpdate {
            chat_id: chat_id.to_string(),
            last_message,
        };
        for participant_id in participant_ids {
            self.emit_to_user(participant_id, &event).await;
        }
    }

    /// Opens an AI response stream targeting a chat room.
    pub fn ai_stream(&self, chat_id: &str, sender: Option<serde_json::Value>) -> AiStream {
        AiStream::new(self.clone(), chat_id.to_string(), sender)
    }

    /// Fanout to a channel's local members, then relay cross-process.
    async fn deliver(
        &self,
        address: &ChannelAddress,
        event: &OutboundEvent,
        except: Option<ConnectionId>,
    ) {
        let channel = address.name();
        for conn_id in self.rooms.members(&channel) {
            if Some(conn_id) == except {
                continue;
            }
            if let Some(conn) = self.pool.get(&conn_id) {
                conn.send(event.clone());
            }
        }

        if let Some(bridge) = &self.bridge {
            match serde_json::to_string(event) {
                Ok(payload) => {
                    if let Err(e) = bridge.publish(&channel, &payload).await {
                        warn!(channel, error = %e, "Cross-process relay failed");
                    }
                }
                Err(e) => warn!(channel, error = %e, "Failed to serialize event for relay"),
            }
        }
    }
}
