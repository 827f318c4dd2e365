//! Real-time WebSocket engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Presence entry TTL in seconds. A user who stops heartbeating is
    /// evicted from the online set after this long, even with no
    /// disconnect event.
    #[serde(default = "default_presence_ttl")]
    pub presence_ttl_seconds: u64,
    /// Heartbeat interval in seconds. Must be shorter than the presence
    /// TTL so a single missed beat does not cause premature eviction.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
    /// Internal per-connection outbound channel buffer size.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Maximum rooms a single connection may join.
    #[serde(default = "default_max_rooms")]
    pub max_rooms_per_connection: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            presence_ttl_seconds: default_presence_ttl(),
            heartbeat_interval_seconds: default_heartbeat_interval(),
            channel_buffer_size: default_channel_buffer(),
            max_rooms_per_connection: default_max_rooms(),
        }
    }
}

fn default_presence_ttl() -> u64 {
    300
}

fn default_heartbeat_interval() -> u64 {
    120
}

fn default_channel_buffer() -> usize {
    256
}

fn default_max_rooms() -> usize {
    50
}
