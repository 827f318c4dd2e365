//! Connection admission — validates the signed credential delivered in
//! the handshake's `Cookie` header.
//!
//! Runs before the transport upgrade completes: no room join and no
//! presence write can happen for a connection this rejects.

use std::sync::Arc;

use parlor_auth::cookie;
use parlor_auth::jwt::JwtDecoder;
use parlor_core::config::auth::AuthConfig;
use parlor_core::error::AppError;

/// Identity extracted from a successfully verified handshake.
#[derive(Debug, Clone)]
pub struct AdmittedUser {
    /// User id from the credential's subject claim.
    pub user_id: String,
}

/// Authenticates inbound connections from handshake metadata.
#[derive(Debug, Clone)]
pub struct ConnectionAuthenticator {
    /// JWT verifier.
    decoder: Arc<JwtDecoder>,
    /// Cookie carrying the access token.
    cookie_name: String,
}

impl ConnectionAuthenticator {
    /// Creates a new authenticator.
    pub fn new(decoder: Arc<JwtDecoder>, config: &AuthConfig) -> Self {
        Self {
            decoder,
            cookie_name: config.access_cookie_name.clone(),
        }
    }

    /// Verifies the handshake's `Cookie` header and extracts the user id.
    ///
    /// Any failure — missing header, missing cookie, bad signature,
    /// expired credential — refuses the connection with an
    /// authentication error and no partial admission.
    pub fn authenticate(&self, cookie_header: Option<&str>) -> Result<AdmittedUser, AppError> {
        let raw = cookie_header
            .ok_or_else(|| AppError::authentication("Missing credential cookie header"))?;

        let token = cookie::cookie_value(raw, &self.cookie_name)
            .ok_or_else(|| AppError::authentication("Missing access token cookie"))?;

        let claims = self.decoder.decode_access_token(token)?;

        Ok(AdmittedUser {
            user_id: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_auth::jwt::JwtEncoder;
    use parlor_core::error::ErrorKind;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            access_ttl_minutes: 15,
            access_cookie_name: "accessToken".to_string(),
        }
    }

    fn authenticator() -> ConnectionAuthenticator {
        let config = auth_config();
        ConnectionAuthenticator::new(Arc::new(JwtDecoder::new(&config)), &config)
    }

    #[test]
    fn valid_cookie_admits_user() {
        let token = JwtEncoder::new(&auth_config())
            .issue_access_token("u1")
            .unwrap();
        let header = format!("theme=dark; accessToken={token}");
        let admitted = authenticator().authenticate(Some(&header)).unwrap();
        assert_eq!(admitted.user_id, "u1");
    }

    #[test]
    fn missing_header_is_refused() {
        let err = authenticator().authenticate(None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn missing_token_cookie_is_refused() {
        let err = authenticator()
            .authenticate(Some("theme=dark"))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn expired_token_is_refused() {
        let mut config = auth_config();
        config.access_ttl_minutes = -10;
        let token = JwtEncoder::new(&config).issue_access_token("u1").unwrap();
        let header = format!("accessToken={token}");
        let err = authenticator().authenticate(Some(&header)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
