//! Input for creating a notification record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use hirepulse_core::types::{NotificationId, UserId};
use hirepulse_core::{AppError, AppResult};

use super::kind::NotificationKind;
use super::model::Notification;

/// A notification that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    /// Owner of the record.
    #[validate(custom(function = "validate_owner"))]
    pub user_id: UserId,
    /// Domain event kind.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Title shown in the dropdown.
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub title: String,
    /// Body text.
    #[validate(length(min = 1, max = 5000), custom(function = "validate_not_blank"))]
    pub content: String,
    /// Opaque metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl NewNotification {
    /// Run field validation and map failures to a `Validation` error.
    pub fn check(&self) -> AppResult<()> {
        self.validate().map_err(|errors| {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|k| k.to_string())
                .collect();
            fields.sort_unstable();
            AppError::validation(format!("Invalid notification: {}", fields.join(", ")))
        })
    }

    /// Materialize the record with a fresh id, unread.
    pub fn into_record(self, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: NotificationId::new(),
            user_id: self.user_id,
            kind: self.kind,
            title: self.title,
            content: self.content,
            is_read: false,
            created_at,
            metadata: self.metadata,
        }
    }
}

fn validate_owner(user_id: &UserId) -> Result<(), ValidationError> {
    if user_id.is_nil() {
        return Err(ValidationError::new("nil_user"));
    }
    Ok(())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
