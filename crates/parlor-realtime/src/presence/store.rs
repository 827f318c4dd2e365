//! Store-backed presence registry.
//!
//! Maps `online:{userId}` to the user's currently-registered
//! connection handle, with a TTL so abrupt process or network death
//! evicts the entry within a bounded window even when no disconnect
//! event ever arrives.
//!
//! At most one entry exists per user; a newer connection for the same
//! user overwrites the older handle (last writer wins). The store —
//! not in-process locking — is the concurrency boundary: every
//! mutation is a single-key atomic operation.
//!
//! Failure semantics: a store outage must never crash or block the
//! connection layer. Every operation logs failures at `warn` and
//! degrades to a no-op or empty result.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use parlor_cache::keys;
use parlor_cache::provider::CacheManager;
use parlor_core::traits::cache::CacheProvider;

use crate::connection::handle::ConnectionId;

/// Registry of which users are online, shared across server processes
/// through the cache backend.
#[derive(Debug, Clone)]
pub struct PresenceStore {
    /// Shared key-value store.
    cache: Arc<CacheManager>,
    /// Entry TTL; refreshed by heartbeats.
    ttl: Duration,
}

impl PresenceStore {
    /// Creates a presence store over the given cache backend.
    pub fn new(cache: Arc<CacheManager>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Upserts the presence entry for a user, resetting its TTL.
    ///
    /// Idempotent; also the heartbeat refresh path when the handle is
    /// unchanged.
    pub async fn set_online(&self, user_id: &str, conn_id: ConnectionId) {
        let key = keys::presence(user_id);
        if let Err(e) = self.cache.set(&key, &conn_id.to_string(), self.ttl).await {
            warn!(user_id, error = %e, "Failed to mark user online");
        }
    }

    /// Returns the connection handle currently registered for a user.
    pub async fn connection_handle(&self, user_id: &str) -> Option<ConnectionId> {
        match self.cache.get(&keys::presence(user_id)).await {
            Ok(Some(raw)) => Uuid::parse_str(&raw).ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to read presence entry");
                None
            }
        }
    }

    /// Unconditionally deletes the presence entry for a user.
    pub async fn set_offline(&self, user_id: &str) {
        if let Err(e) = self.cache.delete(&keys::presence(user_id)).await {
            warn!(user_id, error = %e, "Failed to mark user offline");
        }
    }

    /// Checks whether a user has a live presence entry.
    pub async fn is_online(&self, user_id: &str) -> bool {
        match self.cache.exists(&keys::presence(user_id)).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to check presence");
                false
            }
        }
    }

    /// Extends the TTL of a user's entry without rewriting the handle.
    pub async fn refresh(&self, user_id: &str) {
        match self.cache.expire(&keys::presence(user_id), self.ttl).await {
            Ok(_) => {}
            Err(e) => warn!(user_id, error = %e, "Failed to refresh presence TTL"),
        }
    }

    /// Lists every user with an unexpired presence entry.
    ///
    /// Full scan over the presence namespace — O(online-user-count),
    /// meant for periodic broadcasts rather than per-event use.
    pub async fn online_user_ids(&self) -> Vec<String> {
        match self.cache.keys(&keys::presence_pattern()).await {
            Ok(found) => found
                .iter()
                .filter_map(|k| keys::user_id_from_presence_key(k))
                .map(str::to_string)
                .collect(),
            Err(e) => {
                warn!(error = %e, "Failed to list online users");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_cache::memory::MemoryCacheProvider;
    use parlor_core::config::cache::MemoryCacheConfig;

    fn store(ttl_seconds: u64) -> PresenceStore {
        let provider = MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 1000 }, 300);
        let cache = Arc::new(CacheManager::from_provider(Arc::new(provider)));
        PresenceStore::new(cache, Duration::from_secs(ttl_seconds))
    }

    #[tokio::test]
    async fn set_online_then_lookup() {
        let store = store(300);
        let conn = Uuid::new_v4();
        store.set_online("u1", conn).await;

        assert!(store.is_online("u1").await);
        assert_eq!(store.connection_handle("u1").await, Some(conn));
        assert_eq!(store.online_user_ids().await, vec!["u1".to_string()]);
    }

    #[tokio::test]
    async fn newer_connection_overwrites_handle() {
        let store = store(300);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        store.set_online("u1", first).await;
        store.set_online("u1", second).await;

        assert_eq!(store.connection_handle("u1").await, Some(second));
        // Still exactly one entry for the user.
        assert_eq!(store.online_user_ids().await.len(), 1);
    }

    #[tokio::test]
    async fn set_offline_removes_entry() {
        let store = store(300);
        store.set_online("u1", Uuid::new_v4()).await;
        store.set_offline("u1").await;

        assert!(!store.is_online("u1").await);
        assert!(store.online_user_ids().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_without_heartbeat() {
        // A crashed client never sends a disconnect; TTL eviction is
        // the only thing that takes it offline.
        let store = store(300);
        store.set_online("u1", Uuid::new_v4()).await;

        tokio::time::advance(Duration::from_secs(301)).await;

        assert!(!store.is_online("u1").await);
        assert!(store.online_user_ids().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_extends_ttl() {
        let store = store(300);
        store.set_online("u1", Uuid::new_v4()).await;

        tokio::time::advance(Duration::from_secs(200)).await;
        store.refresh("u1").await;
        tokio::time::advance(Duration::from_secs(200)).await;

        assert!(store.is_online("u1").await);
    }
}
