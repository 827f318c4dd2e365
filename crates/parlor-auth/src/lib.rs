//! # parlor-auth
//!
//! Verification side of Parlor's session credentials: JWT claims,
//! encoder/decoder, and parsing of the handshake `Cookie` header that
//! carries the access token into the WebSocket layer.
//!
//! Credential issuance (sign-up/sign-in) lives outside this
//! repository; the encoder exists for the server's own tooling and
//! for tests.

pub mod cookie;
pub mod jwt;
