//! Cross-process fanout bridge.
//!
//! A single process fans out through the in-memory registry; a fleet
//! needs a shared pub/sub substrate so room and user channels reach
//! connections held by other processes. The `redis-pubsub` feature
//! provides the publishing side over the same Redis that backs
//! presence.

pub mod redis_pubsub;

pub use redis_pubsub::RedisPubSubBridge;
