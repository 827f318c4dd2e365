//! In-memory cache backend (single-process deployments and tests).

pub mod store;

pub use store::MemoryCacheProvider;
