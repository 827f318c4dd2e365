//! Shared trait definitions.

pub mod cache;

pub use cache::CacheProvider;
