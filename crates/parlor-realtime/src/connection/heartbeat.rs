//! Presence heartbeat for a connection.
//!
//! Re-registers the connection's presence entry on a fixed interval,
//! extending the TTL. The interval is deliberately shorter than the
//! TTL so a single missed beat does not evict a live user.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::presence::store::PresenceStore;

use super::handle::ConnectionHandle;

/// Spawns the heartbeat task for a connection.
///
/// The loop ends when the handle is closed; the owning session also
/// aborts the task on teardown, so either path stops it.
pub(crate) fn spawn_heartbeat(
    presence: Arc<PresenceStore>,
    handle: Arc<ConnectionHandle>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The interval's first tick completes immediately; admission
        // already wrote the presence entry, so consume it.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if handle.is_closed() {
                break;
            }
            presence.set_online(&handle.user_id, handle.id).await;
        }
        debug!(conn_id = %handle.id, "Heartbeat loop ended");
    })
}
