//! Session credential payload.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use hirepulse_core::types::{SessionId, UserId};

/// What a session token asserts: which user, from which login, until when.
///
/// The live transport binds a socket to `sub`; REST handlers scope every
/// query to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub sid: SessionId,
    /// Display name, only used in log fields.
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Claims for a token issued at `issued_at` and valid for `ttl`.
    pub fn issue(
        user_id: UserId,
        session_id: SessionId,
        username: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: user_id,
            sid: session_id,
            username: username.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.sub
    }

    pub fn session_id(&self) -> SessionId {
        self.sid
    }

    /// Whether the token is no longer valid at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
