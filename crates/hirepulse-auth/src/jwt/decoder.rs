//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use hirepulse_core::config::AuthConfig;
use hirepulse_core::error::AppError;

use super::claims::Claims;

/// Validates JWT access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // seconds of clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!(error = %e, "Rejected session credential");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use chrono::Utc;
    use hirepulse_core::error::ErrorKind;
    use hirepulse_core::types::{SessionId, UserId};

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_access_ttl_minutes: 10,
        }
    }

    #[test]
    fn test_roundtrip() {
        let cfg = config("test-secret");
        let user = UserId::new();
        let (token, _) = JwtEncoder::new(&cfg)
            .generate_access_token(user, SessionId::new(), "recruiter")
            .expect("encode");
        let claims = JwtDecoder::new(&cfg).decode_access_token(&token).expect("decode");
        assert_eq!(claims.user_id(), user);
        assert_eq!(claims.username, "recruiter");
        assert!(!claims.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (token, _) = JwtEncoder::new(&config("a"))
            .generate_access_token(UserId::new(), SessionId::new(), "x")
            .expect("encode");
        let err = JwtDecoder::new(&config("b"))
            .decode_access_token(&token)
            .expect_err("bad signature");
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_expired_rejected() {
        let cfg = config("s");
        let claims = Claims::issue(
            UserId::new(),
            SessionId::new(),
            "old",
            Utc::now() - chrono::Duration::hours(2),
            chrono::Duration::hours(1),
        );
        let token = JwtEncoder::new(&cfg).encode_claims(&claims).expect("encode");
        let err = JwtDecoder::new(&cfg)
            .decode_access_token(&token)
            .expect_err("expired");
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn test_garbage_rejected() {
        let err = JwtDecoder::new(&config("s"))
            .decode_access_token("not-a-jwt")
            .expect_err("garbage");
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
