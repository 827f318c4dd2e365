//! Typed channel addresses.
//!
//! Two namespaces exist: `user:{userId}` — the implicit personal
//! channel every admitted connection joins, and `room:{roomId}` —
//! explicit chat rooms joined on request.

/// A typed channel address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelAddress {
    /// Personal user channel; reaches every connection the user has open.
    User(String),
    /// Chat room channel.
    Room(String),
}

impl ChannelAddress {
    /// Returns the channel name string used by the registry.
    pub fn name(&self) -> String {
        match self {
            ChannelAddress::User(id) => format!("user:{id}"),
            ChannelAddress::Room(id) => format!("room:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_carries_the_namespace_prefix() {
        assert_eq!(ChannelAddress::Room("c7".into()).name(), "room:c7");
        assert_eq!(ChannelAddress::User("u1".into()).name(), "user:u1");
    }
}
