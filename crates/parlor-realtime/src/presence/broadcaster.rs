//! Online-set broadcaster.
//!
//! On every online/offline transition the full online set is
//! recomputed from the store and pushed to every connected session.
//! O(online-count) per transition; fine at moderate scale. Incremental
//! delta events are the known evolution path if connection counts
//! outgrow this.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::bridge::RedisPubSubBridge;
use crate::connection::pool::ConnectionPool;
use crate::message::types::OutboundEvent;

use super::store::PresenceStore;

/// Pub/sub channel carrying online-set broadcasts between processes.
const PRESENCE_CHANNEL: &str = "presence:online";

/// Publishes the recomputed online-user set to all local connections,
/// and relays it cross-process when a bridge is configured.
#[derive(Debug, Clone)]
pub struct PresenceBroadcaster {
    /// Source of truth for the online set.
    store: Arc<PresenceStore>,
    /// All connections of this process.
    pool: Arc<ConnectionPool>,
    /// Cross-process relay; `None` in single-node deployments.
    bridge: Option<Arc<RedisPubSubBridge>>,
}

impl PresenceBroadcaster {
    /// Creates a new broadcaster.
    pub fn new(
        store: Arc<PresenceStore>,
        pool: Arc<ConnectionPool>,
        bridge: Option<Arc<RedisPubSubBridge>>,
    ) -> Self {
        Self { store, pool, bridge }
    }

    /// Recomputes the online set and sends it to every connection.
    ///
    /// Other processes see the same store, so the relayed event lets
    /// their connections refresh without waiting for a local
    /// transition of their own.
    pub async fn broadcast_online_users(&self) {
        let users = self.store.online_user_ids().await;
        debug!(count = users.len(), "Broadcasting online user set");

        let event = OutboundEvent::OnlineUsers(users);
        for conn in self.pool.all_connections() {
            conn.send(event.clone());
        }

        if let Some(bridge) = &self.bridge {
            match serde_json::to_string(&event) {
                Ok(payload) => {
                    if let Err(e) = bridge.publish(PRESENCE_CHANNEL, &payload).await {
                        warn!(error = %e, "Cross-process presence relay failed");
                    }
                }
                Err(e) => warn!(error = %e, "Failed to serialize online set for relay"),
            }
        }
    }
}
