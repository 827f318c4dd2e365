//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// JWT authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify access tokens.
    pub jwt_secret: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: i64,
    /// Name of the cookie carrying the access token in the
    /// WebSocket handshake.
    #[serde(default = "default_cookie_name")]
    pub access_cookie_name: String,
}

fn default_access_ttl() -> i64 {
    15
}

fn default_cookie_name() -> String {
    "accessToken".to_string()
}
