//! Minimal `Cookie` header parsing for the WebSocket handshake.
//!
//! The access token reaches the real-time layer as a cookie on the
//! upgrade request, not as an explicit payload, so this is the only
//! cookie handling the server needs.

/// Extracts the value of a named cookie from a raw `Cookie` header.
///
/// Follows RFC 6265 form: `name=value` pairs separated by `"; "`.
/// Returns `None` when the cookie is absent or the header is malformed.
pub fn cookie_value<'a>(raw_header: &'a str, name: &str) -> Option<&'a str> {
    raw_header.split(';').find_map(|pair| {
        let mut parts = pair.trim().splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == name => Some(v),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_token_among_other_cookies() {
        let raw = "theme=dark; accessToken=abc.def.ghi; lang=en";
        assert_eq!(cookie_value(raw, "accessToken"), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_cookie_is_none() {
        assert_eq!(cookie_value("theme=dark", "accessToken"), None);
    }

    #[test]
    fn value_may_contain_equals() {
        let raw = "accessToken=a=b=c";
        assert_eq!(cookie_value(raw, "accessToken"), Some("a=b=c"));
    }

    #[test]
    fn empty_header_is_none() {
        assert_eq!(cookie_value("", "accessToken"), None);
    }
}
