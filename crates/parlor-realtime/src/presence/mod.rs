//! Presence: the store-backed online registry and the online-set
//! broadcaster.

pub mod broadcaster;
pub mod store;

pub use broadcaster::PresenceBroadcaster;
pub use store::PresenceStore;
