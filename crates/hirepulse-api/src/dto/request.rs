//! Request DTOs.

use serde::Deserialize;

use hirepulse_core::error::AppError;
use hirepulse_core::types::{DEFAULT_PAGE_LIMIT, PageRequest};
use hirepulse_entity::{NotificationFilter, NotificationKind};

/// Query string of `GET /api/notifications`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListNotificationsQuery {
    /// Notification kind, e.g. `BIAS_ALERT`. Empty means any.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Free text over title and content.
    pub query: Option<String>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub limit: Option<u64>,
}

impl ListNotificationsQuery {
    /// Builds the store filter, rejecting unknown kinds.
    pub fn filter(&self) -> Result<NotificationFilter, AppError> {
        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<NotificationKind>()?),
        };
        Ok(NotificationFilter {
            kind,
            query: self.query.clone(),
        })
    }

    /// Page request with defaults and clamping applied.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        )
    }
}
