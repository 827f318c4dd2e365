//! # parlor-realtime
//!
//! Real-time presence and fanout core for Parlor. Provides:
//!
//! - WebSocket connection admission with JWT cookie authentication
//! - A store-backed presence registry with TTL eviction, shared
//!   across server processes
//! - Per-connection session state machines with heartbeat refresh and
//!   disconnect reconciliation (multi-tab safe)
//! - Room channels and an event router for per-user, per-room, and
//!   except-sender delivery, including chunked AI streaming
//! - Online-set broadcasting on every presence transition
//! - Multi-node fanout via a Redis pub/sub bridge (feature
//!   `redis-pubsub`)

pub mod bridge;
pub mod connection;
pub mod message;
pub mod presence;
pub mod room;
pub mod router;
pub mod server;

pub use connection::authenticator::ConnectionAuthenticator;
pub use connection::session::ConnectionSession;
pub use presence::store::PresenceStore;
pub use router::EventRouter;
pub use server::RealtimeEngine;
