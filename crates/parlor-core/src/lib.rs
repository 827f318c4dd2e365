//! # parlor-core
//!
//! Core crate for the Parlor chat server. Contains configuration
//! schemas, the unified error system, and the cache provider trait.
//!
//! This crate has **no** internal dependencies on other Parlor crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
