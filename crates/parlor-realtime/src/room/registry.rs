//! Room membership registry.
//!
//! Memberships are ephemeral and in-process: they exist only for the
//! lifetime of a connection and are rebuilt through explicit joins.
//! Forward (channel → members) and reverse (connection → channels)
//! indexes are kept together so disconnect cleanup is O(channels
//! joined), not O(all channels).

use std::collections::HashSet;

use dashmap::DashMap;

use crate::connection::handle::ConnectionId;

/// Concurrent registry of channel memberships.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    /// Channel name → member connection ids.
    members: DashMap<String, HashSet<ConnectionId>>,
    /// Connection id → channel names joined.
    joined: DashMap<ConnectionId, HashSet<String>>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to a channel.
    ///
    /// Returns `false` if the connection was already a member
    /// (membership is unique per connection/channel pair).
    pub fn join(&self, channel: &str, conn_id: ConnectionId) -> bool {
        let added = self
            .members
            .entry(channel.to_string())
            .or_default()
            .insert(conn_id);
        if added {
            self.joined
                .entry(conn_id)
                .or_default()
                .insert(channel.to_string());
        }
        added
    }

    /// Removes a connection from a channel. Empty channels are dropped.
    pub fn leave(&self, channel: &str, conn_id: ConnectionId) {
        if let Some(mut set) = self.members.get_mut(channel) {
            set.remove(&conn_id);
            if set.is_empty() {
                drop(set);
                self.members.remove(channel);
            }
        }
        if let Some(mut channels) = self.joined.get_mut(&conn_id) {
            channels.remove(channel);
        }
    }

    /// Removes a connection from every channel it joined.
    pub fn leave_all(&self, conn_id: ConnectionId) {
        let channels = self
            .joined
            .remove(&conn_id)
            .map(|(_, set)| set)
            .unwrap_or_default();
        for channel in &channels {
            if let Some(mut set) = self.members.get_mut(channel) {
                set.remove(&conn_id);
                if set.is_empty() {
                    drop(set);
                    self.members.remove(channel);
                }
            }
        }
    }

    /// Returns the member connection ids of a channel.
    pub fn members(&self, channel: &str) -> Vec<ConnectionId> {
        self.members
            .get(channel)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns how many channels a connection has joined.
    pub fn joined_count(&self, conn_id: ConnectionId) -> usize {
        self.joined.get(&conn_id).map(|set| set.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn join_is_unique_per_connection() {
        let registry = RoomRegistry::new();
        let conn = Uuid::new_v4();
        assert!(registry.join("room:c1", conn));
        assert!(!registry.join("room:c1", conn));
        assert_eq!(registry.members("room:c1"), vec![conn]);
    }

    #[test]
    fn leave_all_clears_both_indexes_and_empty_channels() {
        let registry = RoomRegistry::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        registry.join("room:c1", a);
        registry.join("room:c1", b);
        registry.join("room:c2", a);

        registry.leave_all(a);

        assert_eq!(registry.joined_count(a), 0);
        assert_eq!(registry.members("room:c1"), vec![b]);
        assert!(registry.members("room:c2").is_empty());
    }

    #[test]
    fn members_of_unknown_channel_is_empty() {
        let registry = RoomRegistry::new();
        assert!(registry.members("room:nowhere").is_empty());
    }
}
