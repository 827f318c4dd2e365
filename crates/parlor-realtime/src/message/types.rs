//! Inbound and outbound wire event type definitions.
//!
//! Events are JSON objects of the form `{"event": name, "data": payload}`.
//! Chat and message bodies are forwarded opaquely as JSON values; the
//! real-time layer never inspects them.

use serde::{Deserialize, Serialize};

/// Events sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum InboundEvent {
    /// Join a chat room. Acknowledged with [`OutboundEvent::JoinAck`].
    #[serde(rename = "chat:join", rename_all = "camelCase")]
    ChatJoin {
        /// Room identifier (a chat id).
        chat_id: String,
    },
    /// Leave a chat room.
    #[serde(rename = "chat:leave", rename_all = "camelCase")]
    ChatLeave {
        /// Room identifier.
        chat_id: String,
    },
}

/// Events sent by the server to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum OutboundEvent {
    /// Full online-user set, broadcast on every presence transition.
    #[serde(rename = "online:users")]
    OnlineUsers(Vec<String>),
    /// A new chat was created; sent to each participant's user channel.
    #[serde(rename = "chat:new")]
    ChatNew(serde_json::Value),
    /// A new message in a room; sender excluded when resolvable.
    #[serde(rename = "message:new")]
    MessageNew(serde_json::Value),
    /// A chat's last message changed; sent to participant user channels.
    #[serde(rename = "chat:update", rename_all = "camelCase")]
    ChatUpdate {
        /// Chat identifier.
        chat_id: String,
        /// The new last message.
        last_message: serde_json::Value,
    },
    /// One step of a streamed AI response for a room.
    ///
    /// `seq` is monotonically non-decreasing within a stream and
    /// `done: true` is terminal; consumers must ignore later chunks
    /// for the same stream.
    #[serde(rename = "chat:ai", rename_all = "camelCase")]
    ChatAi {
        /// Chat (room) identifier.
        chat_id: String,
        /// Partial content; `None` on the terminal event.
        chunk: Option<String>,
        /// Stream sequence marker.
        seq: u64,
        /// Whether this is the terminal event of the stream.
        done: bool,
        /// Completed message; present only on the terminal event.
        message: Option<serde_json::Value>,
        /// Sender descriptor (the AI participant).
        sender: Option<serde_json::Value>,
    },
    /// Result of a `chat:join` request.
    #[serde(rename = "chat:join:ack", rename_all = "camelCase")]
    JoinAck {
        /// Room identifier the join targeted.
        chat_id: String,
        /// Whether the join succeeded.
        ok: bool,
        /// Failure reason when `ok` is false.
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// Protocol error (e.g. an unparseable inbound event).
    #[serde(rename = "error")]
    Error {
        /// Machine-readable code.
        code: String,
        /// Human-readable description.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn online_users_serializes_as_bare_array() {
        let event = OutboundEvent::OnlineUsers(vec!["u1".into(), "u2".into()]);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"event": "online:users", "data": ["u1", "u2"]})
        );
    }

    #[test]
    fn chat_ai_uses_camel_case_fields() {
        let event = OutboundEvent::ChatAi {
            chat_id: "c1".into(),
            chunk: Some("hel".into()),
            seq: 1,
            done: false,
            message: None,
            sender: None,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "chat:ai");
        assert_eq!(value["data"]["chatId"], "c1");
        assert_eq!(value["data"]["chunk"], "hel");
        assert_eq!(value["data"]["done"], false);
    }

    #[test]
    fn inbound_join_parses() {
        let raw = r#"{"event":"chat:join","data":{"chatId":"c42"}}"#;
        let event: InboundEvent = serde_json::from_str(raw).unwrap();
        match event {
            InboundEvent::ChatJoin { chat_id } => assert_eq!(chat_id, "c42"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn unknown_inbound_event_fails_to_parse() {
        let raw = r#"{"event":"chat:fly","data":{}}"#;
        assert!(serde_json::from_str::<InboundEvent>(raw).is_err());
    }

    #[test]
    fn join_ack_omits_error_when_ok() {
        let event = OutboundEvent::JoinAck {
            chat_id: "c1".into(),
            ok: true,
            error: None,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert!(value["data"].get("error").is_none());
    }
}
