//! Per-connection session state machine.
//!
//! `Connecting → Admitted → Active → Closed`, with `Closed` terminal.
//! Admission registers presence, broadcasts the online set, and joins
//! the user's implicit personal channel. Teardown runs the disconnect
//! reconciliation that keeps multi-tab presence correct.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use parlor_core::config::realtime::RealtimeConfig;
use parlor_core::error::AppError;
use parlor_core::result::AppResult;

use crate::message::types::OutboundEvent;
use crate::presence::broadcaster::PresenceBroadcaster;
use crate::presence::store::PresenceStore;
use crate::room::address::ChannelAddress;
use crate::room::registry::RoomRegistry;

use super::handle::{ConnectionHandle, ConnectionId};
use super::heartbeat::spawn_heartbeat;
use super::pool::ConnectionPool;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    /// Pre-authentication handshake.
    Connecting = 0,
    /// Authenticated; presence registered.
    Admitted = 1,
    /// Steady operating state.
    Active = 2,
    /// Terminal.
    Closed = 3,
}

impl SessionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => SessionState::Connecting,
            1 => SessionState::Admitted,
            2 => SessionState::Active,
            _ => SessionState::Closed,
        }
    }
}

/// Engine-wide registry of live sessions, keyed by connection id.
pub(crate) type SessionRegistry = DashMap<ConnectionId, Arc<ConnectionSession>>;

/// State machine for one admitted connection.
///
/// Owns the heartbeat task (created once on admission, torn down
/// exactly once on close) and this connection's room memberships,
/// which are discarded with the session.
pub struct ConnectionSession {
    handle: Arc<ConnectionHandle>,
    pool: Arc<ConnectionPool>,
    rooms: Arc<RoomRegistry>,
    presence: Arc<PresenceStore>,
    broadcaster: Arc<PresenceBroadcaster>,
    sessions: Arc<SessionRegistry>,
    config: RealtimeConfig,
    state: AtomicU8,
    heartbeat: Mutex<Option<JoinHandle<()>>>,
}

// Manual impl: the session registry holds `Arc<ConnectionSession>`,
// so deriving Debug here would recurse through it.
impl std::fmt::Debug for ConnectionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSession")
            .field("handle", &self.handle)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl ConnectionSession {
    /// Creates a session in the `Connecting` state.
    pub(crate) fn new(
        handle: Arc<ConnectionHandle>,
        pool: Arc<ConnectionPool>,
        rooms: Arc<RoomRegistry>,
        presence: Arc<PresenceStore>,
        broadcaster: Arc<PresenceBroadcaster>,
        sessions: Arc<SessionRegistry>,
        config: RealtimeConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            handle,
            pool,
            rooms,
            presence,
            broadcaster,
            sessions,
            config,
            state: AtomicU8::new(SessionState::Connecting as u8),
            heartbeat: Mutex::new(None),
        })
    }

    /// Admits the session after successful authentication.
    ///
    /// In order: register in the pool, write the presence entry,
    /// broadcast the recomputed online set, join the personal channel,
    /// start the heartbeat. Then the session is `Active`.
    pub(crate) async fn admit(self: &Arc<Self>) {
        self.state
            .store(SessionState::Admitted as u8, Ordering::SeqCst);

        self.pool.add(self.handle.clone());
        self.presence
            .set_online(&self.handle.user_id, self.handle.id)
            .await;
        self.broadcaster.broadcast_online_users().await;

        self.rooms.join(
            &ChannelAddress::User(self.handle.user_id.clone()).name(),
            self.handle.id,
        );

        let heartbeat = spawn_heartbeat(
            self.presence.clone(),
            self.handle.clone(),
            Duration::from_secs(self.config.heartbeat_interval_seconds),
        );
        *self.heartbeat.lock().await = Some(heartbeat);

        self.state
            .store(SessionState::Active as u8, Ordering::SeqCst);

        info!(
            conn_id = %self.handle.id,
            user_id = %self.handle.user_id,
            "Connection admitted"
        );
    }

    /// Returns this session's connection id.
    pub fn connection_id(&self) -> ConnectionId {
        self.handle.id
    }

    /// Returns the user this session belongs to.
    pub fn user_id(&self) -> &str {
        &self.handle.user_id
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Checks whether the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.state() == SessionState::Closed || self.handle.is_closed()
    }

    /// Sends an outbound event to this connection.
    pub fn send(&self, event: OutboundEvent) -> bool {
        self.handle.send(event)
    }

    /// Resolves once the session has been closed, whether by the peer,
    /// a send failure, or an engine shutdown.
    pub async fn closed(&self) {
        self.handle.closed().await;
    }

    /// Joins a room. Idempotent per (connection, room) pair.
    ///
    /// Failure is reported to the caller (who acks it back to the
    /// client) and never closes the connection.
    pub fn join_room(&self, room_id: &str) -> AppResult<()> {
        if self.is_closed() {
            return Err(AppError::validation("Session is closed"));
        }
        if room_id.trim().is_empty() {
            return Err(AppError::validation("Room id must not be empty"));
        }
        if self.rooms.joined_count(self.handle.id) >= self.config.max_rooms_per_connection {
            return Err(AppError::validation(format!(
                "Room limit reached ({})",
                self.config.max_rooms_per_connection
            )));
        }

        self.rooms
            .join(&ChannelAddress::Room(room_id.to_string()).name(), self.handle.id);
        debug!(
            conn_id = %self.handle.id,
            user_id = %self.handle.user_id,
            room_id,
            "Joined room"
        );
        Ok(())
    }

    /// Leaves a room. Leaving a room never joined is a no-op.
    pub fn leave_room(&self, room_id: &str) {
        if room_id.trim().is_empty() {
            return;
        }
        self.rooms
            .leave(&ChannelAddress::Room(room_id.to_string()).name(), self.handle.id);
        debug!(
            conn_id = %self.handle.id,
            user_id = %self.handle.user_id,
            room_id,
            "Left room"
        );
    }

    /// Closes the session. Idempotent; clean, abrupt, and
    /// administrative disconnects all land here.
    ///
    /// Reconciliation: the presence entry is cleared only if it still
    /// names *this* connection. If a newer connection for the same
    /// user has overwritten it (second tab opened, first closed), the
    /// entry is left alone so the user stays online.
    pub async fn close(&self) {
        let previous = self.state.swap(SessionState::Closed as u8, Ordering::SeqCst);
        if previous == SessionState::Closed as u8 {
            return;
        }

        if let Some(heartbeat) = self.heartbeat.lock().await.take() {
            heartbeat.abort();
        }
        self.handle.mark_closed();
        self.sessions.remove(&self.handle.id);
        self.pool.remove(&self.handle.id);
        self.rooms.leave_all(self.handle.id);

        match self.presence.connection_handle(&self.handle.user_id).await {
            Some(current) if current == self.handle.id => {
                self.presence.set_offline(&self.handle.user_id).await;
                self.broadcaster.broadcast_online_users().await;
                info!(
                    conn_id = %self.handle.id,
                    user_id = %self.handle.user_id,
                    "Connection closed, user offline"
                );
            }
            _ => {
                // Superseded by a newer connection, or already evicted.
                debug!(
                    conn_id = %self.handle.id,
                    user_id = %self.handle.user_id,
                    "Connection closed, presence left to newer connection"
                );
            }
        }
    }
}
