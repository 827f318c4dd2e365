//! Room channels: the addressing scheme and membership registry used
//! for fanout.

pub mod address;
pub mod registry;

pub use address::ChannelAddress;
pub use registry::RoomRegistry;
