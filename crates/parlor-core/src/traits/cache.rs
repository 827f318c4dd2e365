//! Cache provider trait for pluggable caching backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for cache backends (Redis or in-memory).
///
/// All values are stored as strings. The provider is responsible for
/// key prefixing and per-entry TTL enforcement. The presence layer is
/// built entirely on these operations, so every mutation must be
/// atomic at the store (single key, no read-modify-write).
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL, resetting the expiry if the key exists.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Set a value with the default TTL.
    async fn set_default(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists and has not expired.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Reset the TTL on an existing key without rewriting its value.
    /// Returns `false` if the key does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool>;

    /// List all unexpired keys matching a glob-style pattern
    /// (e.g. `"online:*"`). Returned keys carry no provider prefix.
    ///
    /// O(store size) — intended for periodic scans, not hot paths.
    async fn keys(&self, pattern: &str) -> AppResult<Vec<String>>;

    /// Check that the cache backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
