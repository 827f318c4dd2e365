//! # parlor-cache
//!
//! Cache backends for Parlor. The cache is also the shared presence
//! store: `online:{userId}` entries live here with a TTL, so multiple
//! server processes agree on who is online as long as they share the
//! same Redis instance.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
