//! # parlor-api
//!
//! HTTP surface for Parlor: the WebSocket upgrade endpoint, a health
//! probe, CORS for the browser client, and the mapping from domain
//! errors to HTTP responses.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
