//! Chunked delivery of incrementally generated AI responses.

use crate::message::types::OutboundEvent;

use super::EventRouter;

/// One logical AI response stream targeting a chat room.
///
/// Emits `chat:ai` events with a monotonically non-decreasing `seq`.
/// Blank chunks are suppressed so clients never render empty updates.
/// `finish` emits exactly one terminal `done: true` event; anything
/// pushed after that is ignored.
#[derive(Debug)]
pub struct AiStream {
    router: EventRouter,
    chat_id: String,
    sender: Option<serde_json::Value>,
    seq: u64,
    done: bool,
}

impl AiStream {
    pub(super) fn new(
        router: EventRouter,
        chat_id: String,
        sender: Option<serde_json::Value>,
    ) -> Self {
        Self {
            router,
            chat_id,
            sender,
            seq: 0,
            done: false,
        }
    }

    /// Emits one partial-content event, unless the chunk is blank or
    /// the stream has already finished.
    pub async fn push_chunk(&mut self, chunk: &str) {
        if self.done || chunk.trim().is_empty() {
            return;
        }
        self.seq += 1;
        let event = OutboundEvent::ChatAi {
            chat_id: self.chat_id.clone(),
            chunk: Some(chunk.to_string()),
            seq: self.seq,
            done: false,
            message: None,
            sender: self.sender.clone(),
        };
        self.router.emit_to_room(&self.chat_id, &event).await;
    }

    /// Terminates the stream, carrying the completed message if any.
    /// Idempotent: only the first call emits.
    pub async fn finish(&mut self, message: Option<serde_json::Value>) {
        if self.done {
            return;
        }
        self.done = true;
        self.seq += 1;
        let event = OutboundEvent::ChatAi {
            chat_id: self.chat_id.clone(),
            chunk: None,
            seq: self.seq,
            done: true,
            message,
            sender: self.sender.clone(),
        };
        self.router.emit_to_room(&self.chat_id, &event).await;
    }

    /// Whether the terminal event has been emitted.
    pub fn is_finished(&self) -> bool {
        self.done
    }
}
