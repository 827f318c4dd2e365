//! In-memory cache implementation with per-entry TTL.
//!
//! Presence correctness depends on exact per-entry expiry, so entries
//! carry their own deadline instead of relying on a cache-wide TTL.
//! `tokio::time::Instant` is used as the clock, which lets tests run
//! under tokio's paused time.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use parlor_core::config::cache::MemoryCacheConfig;
use parlor_core::result::AppResult;
use parlor_core::traits::cache::CacheProvider;

/// A single cached value with its expiry deadline.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory cache provider backed by a concurrent map.
///
/// Expired entries are dropped lazily on read and during scans; a
/// capacity check purges them eagerly before inserting when full.
#[derive(Debug)]
pub struct MemoryCacheProvider {
    entries: DashMap<String, Entry>,
    default_ttl: Duration,
    max_capacity: u64,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig, default_ttl_seconds: u64) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl: Duration::from_secs(default_ttl_seconds),
            max_capacity: config.max_capacity,
        }
    }

    /// Drop every expired entry.
    fn purge_expired(&self) {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.value().is_expired(now))
            .map(|e| e.key().clone())
            .collect();
        for key in expired {
            self.entries.remove(&key);
        }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let now = Instant::now();
        // The shard guard must be released before removing the key.
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        if self.entries.len() as u64 >= self.max_capacity {
            self.purge_expired();
            if self.entries.len() as u64 >= self.max_capacity {
                debug!(capacity = self.max_capacity, "Memory cache over capacity");
            }
        }
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn set_default(&self, key: &str, value: &str) -> AppResult<()> {
        self.set(key, value, self.default_ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let now = Instant::now();
        // The shard guard must be released before removing the key.
        let expired = match self.entries.get_mut(key) {
            Some(mut entry) if !entry.is_expired(now) => {
                entry.expires_at = now + ttl;
                return Ok(true);
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        Ok(false)
    }

    async fn keys(&self, pattern: &str) -> AppResult<Vec<String>> {
        // Patterns end in a single trailing `*`; everything before it
        // is matched as a literal prefix.
        let prefix = pattern.trim_end_matches('*');
        let now = Instant::now();
        Ok(self
            .entries
            .iter()
            .filter(|e| e.key().starts_with(prefix) && !e.value().is_expired(now))
            .map(|e| e.key().clone())
            .collect())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
