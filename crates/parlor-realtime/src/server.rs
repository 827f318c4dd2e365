//! Top-level real-time engine that ties the subsystems together.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use parlor_cache::provider::CacheManager;
use parlor_core::config::realtime::RealtimeConfig;

use crate::bridge::RedisPubSubBridge;
use crate::connection::handle::ConnectionHandle;
use crate::connection::pool::ConnectionPool;
use crate::connection::session::{ConnectionSession, SessionRegistry};
use crate::message::types::OutboundEvent;
use crate::presence::broadcaster::PresenceBroadcaster;
use crate::presence::store::PresenceStore;
use crate::room::registry::RoomRegistry;
use crate::router::EventRouter;

/// Central engine coordinating presence, rooms, and routing.
///
/// Constructed once at startup and shared behind an `Arc`; the router
/// it exposes is the only way domain services emit real-time events.
#[derive(Debug)]
pub struct RealtimeEngine {
    pool: Arc<ConnectionPool>,
    rooms: Arc<RoomRegistry>,
    presence: Arc<PresenceStore>,
    broadcaster: Arc<PresenceBroadcaster>,
    sessions: Arc<SessionRegistry>,
    router: EventRouter,
    config: RealtimeConfig,
}

impl RealtimeEngine {
    /// Creates a new engine over the shared cache backend.
    ///
    /// `bridge` enables cross-process fanout; pass `None` for
    /// single-node deployments.
    pub fn new(
        config: RealtimeConfig,
        cache: Arc<CacheManager>,
        bridge: Option<Arc<RedisPubSubBridge>>,
    ) -> Self {
        let pool = Arc::new(ConnectionPool::new());
        let rooms = Arc::new(RoomRegistry::new());
        let presence = Arc::new(PresenceStore::new(
            cache,
            Duration::from_secs(config.presence_ttl_seconds),
        ));
        let broadcaster = Arc::new(PresenceBroadcaster::new(
            presence.clone(),
            pool.clone(),
            bridge.clone(),
        ));
        let router = EventRouter::new(pool.clone(), rooms.clone(), presence.clone(), bridge);

        info!("Real-time engine initialized");

        Self {
            pool,
            rooms,
            presence,
            broadcaster,
            sessions: Arc::new(SessionRegistry::new()),
            router,
            config,
        }
    }

    /// Admits an authenticated connection and returns its session plus
    /// the receiver for outbound events.
    ///
    /// Must only be called after the handshake credential has been
    /// verified; admission writes presence immediately.
    pub async fn connect(
        &self,
        user_id: &str,
    ) -> (Arc<ConnectionSession>, mpsc::Receiver<OutboundEvent>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id.to_string(), tx));

        let session = ConnectionSession::new(
            handle,
            self.pool.clone(),
            self.rooms.clone(),
            self.presence.clone(),
            self.broadcaster.clone(),
            self.sessions.clone(),
            self.config.clone(),
        );
        self.sessions.insert(session.connection_id(), session.clone());
        session.admit().await;

        (session, rx)
    }

    /// Returns the event router for domain services.
    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    /// Returns the presence store.
    pub fn presence(&self) -> &Arc<PresenceStore> {
        &self.presence
    }

    /// Returns the number of connections held by this process.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Returns the number of distinct users with a connection here.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }

    /// Closes every live session, running the regular `Closed`
    /// reconciliation for each so presence entries are cleared before
    /// the process exits. Transport handlers parked on
    /// [`ConnectionSession::closed`] wake and tear down their sockets.
    pub async fn shutdown(&self) {
        let all: Vec<_> = self.sessions.iter().map(|e| e.value().clone()).collect();
        info!(count = all.len(), "Real-time engine shutting down");
        for session in all {
            session.close().await;
        }
    }
}
