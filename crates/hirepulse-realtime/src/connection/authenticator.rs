//! WebSocket authentication — validates the JWT passed as a query parameter.

use std::sync::Arc;

use hirepulse_auth::jwt::JwtDecoder;
use hirepulse_core::error::AppError;
use hirepulse_core::types::{SessionId, UserId};

/// Authenticated connection info extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthenticatedConnection {
    /// User ID.
    pub user_id: UserId,
    /// Session ID.
    pub session_id: SessionId,
    /// Username.
    pub username: String,
}

/// Authenticates WebSocket connections using JWT tokens.
#[derive(Clone)]
pub struct WsAuthenticator {
    /// JWT decoder.
    decoder: Arc<JwtDecoder>,
}

impl std::fmt::Debug for WsAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsAuthenticator").finish()
    }
}

impl WsAuthenticator {
    /// Creates a new WebSocket authenticator.
    pub fn new(decoder: Arc<JwtDecoder>) -> Self {
        Self { decoder }
    }

    /// Authenticates a connection using a JWT token.
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedConnection, AppError> {
        if token.trim().is_empty() {
            return Err(AppError::authentication("Missing session credential"));
        }

        let claims = self.decoder.decode_access_token(token)?;

        Ok(AuthenticatedConnection {
            user_id: claims.user_id(),
            session_id: claims.session_id(),
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hirepulse_auth::jwt::JwtEncoder;
    use hirepulse_core::config::AuthConfig;

    #[test]
    fn test_authenticate() {
        let config = AuthConfig::default();
        let auth = WsAuthenticator::new(Arc::new(JwtDecoder::new(&config)));
        let user = UserId::new();
        let (token, _) = JwtEncoder::new(&config)
            .generate_access_token(user, SessionId::new(), "hr")
            .expect("token");

        assert_eq!(auth.authenticate(&token).expect("valid").user_id, user);
        assert!(auth.authenticate("").is_err());
        assert!(auth.authenticate("abc.def.ghi").is_err());
    }
}
