//! Path parameter extractor for notification ids.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use hirepulse_core::error::AppError;
use hirepulse_core::types::NotificationId;

use crate::error::ApiError;

/// `{id}` path segment parsed as a [`NotificationId`].
///
/// Malformed ids answer 400 with the standard error body.
#[derive(Debug, Clone, Copy)]
pub struct NotificationPath(pub NotificationId);

impl<S: Send + Sync> FromRequestParts<S> for NotificationPath {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(format!("Invalid path: {e}")))?;
        raw.parse::<NotificationId>()
            .map(NotificationPath)
            .map_err(|_| AppError::validation(format!("Invalid notification id '{raw}'")).into())
    }
}
