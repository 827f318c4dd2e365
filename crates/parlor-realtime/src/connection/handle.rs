//! Individual connection handle.

use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{Notify, mpsc};
use uuid::Uuid;

use crate::message::types::OutboundEvent;

/// Unique connection identifier, generated at registration.
pub type ConnectionId = Uuid;

/// A handle to a single transport connection.
///
/// Holds the sender half of the outbound event channel plus the user
/// the connection was admitted for. Room membership lives in the
/// [`RoomRegistry`](crate::room::RoomRegistry), not here.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection id.
    pub id: ConnectionId,
    /// User this connection was admitted for. Immutable for the
    /// connection's lifetime.
    pub user_id: String,
    /// Sender for outbound events.
    sender: mpsc::Sender<OutboundEvent>,
    /// When the connection was admitted.
    pub connected_at: DateTime<Utc>,
    /// Whether the connection has been closed.
    closed: AtomicBool,
    /// Wakes tasks parked in [`closed`](Self::closed) when the
    /// connection is marked closed.
    closed_notify: Notify,
}

impl ConnectionHandle {
    /// Creates a new connection handle.
    pub fn new(user_id: String, sender: mpsc::Sender<OutboundEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            sender,
            connected_at: Utc::now(),
            closed: AtomicBool::new(false),
            closed_notify: Notify::new(),
        }
    }

    /// Sends an outbound event to this connection.
    ///
    /// Best-effort: a full buffer drops the event (delivery here is
    /// at-most-once) and a closed receiver marks the handle closed.
    pub fn send(&self, event: OutboundEvent) -> bool {
        if self.is_closed() {
            return false;
        }
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Checks whether the connection has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Marks the connection closed and wakes anything waiting on
    /// [`closed`](Self::closed). Idempotent.
    pub fn mark_closed(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.closed_notify.notify_waiters();
    }

    /// Resolves once the connection has been marked closed.
    ///
    /// The transport handler selects on this next to its read loop so
    /// an administrative close terminates idle connections too.
    pub async fn closed(&self) {
        // Register before re-checking the flag so a concurrent
        // mark_closed cannot slip between check and wait.
        let mut notified = pin!(self.closed_notify.notified());
        notified.as_mut().enable();
        if self.is_closed() {
            return;
        }
        notified.await;
    }
}
