//! Wire event definitions for the real-time channel.

pub mod types;

pub use types::{InboundEvent, OutboundEvent};
