//! Cache key builders for all Parlor cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

/// Namespace prefix for presence entries.
pub const ONLINE_PREFIX: &str = "online:";

/// Key for a user's presence entry. The stored value is the
/// connection handle currently registered for the user.
pub fn presence(user_id: &str) -> String {
    format!("{ONLINE_PREFIX}{user_id}")
}

/// Glob pattern matching every presence entry.
pub fn presence_pattern() -> String {
    format!("{ONLINE_PREFIX}*")
}

/// Extracts the user id from a presence key, if it is one.
pub fn user_id_from_presence_key(key: &str) -> Option<&str> {
    key.strip_prefix(ONLINE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_key_roundtrip() {
        let key = presence("64fa12");
        assert_eq!(key, "online:64fa12");
        assert_eq!(user_id_from_presence_key(&key), Some("64fa12"));
    }

    #[test]
    fn non_presence_key_yields_none() {
        assert_eq!(user_id_from_presence_key("session:abc"), None);
    }
}
