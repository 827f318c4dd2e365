//! Redis cache backend (shared presence truth for multi-process fleets).

pub mod client;
pub mod operations;

pub use client::RedisClient;
pub use operations::RedisCacheProvider;
