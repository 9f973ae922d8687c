//! Identity of the caller behind a notification operation.

use hirepulse_core::types::{SessionId, UserId};

/// The authenticated caller.
///
/// Every service method scopes its work to `user_id`; `session_id` and
/// `username` only appear in log fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub username: String,
}

impl RequestContext {
    pub fn new(user_id: UserId, session_id: SessionId, username: String) -> Self {
        Self {
            user_id,
            session_id,
            username,
        }
    }
}
