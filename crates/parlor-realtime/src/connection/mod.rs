//! Connection lifecycle: handles, the pool, handshake authentication,
//! heartbeat, and the per-connection session state machine.

pub mod authenticator;
pub mod handle;
pub mod heartbeat;
pub mod pool;
pub mod session;

pub use handle::{ConnectionHandle, ConnectionId};
pub use pool::ConnectionPool;
pub use session::ConnectionSession;
