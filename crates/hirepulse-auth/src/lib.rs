//! # hirepulse-auth
//!
//! Session credentials for the notification pipeline. Credentials are
//! issued by the hiring application's login flow; this crate verifies them
//! for REST and WebSocket requests and can mint them for development and
//! tests.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
