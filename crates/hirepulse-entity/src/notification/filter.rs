//! List filter shared by the server store and the client projections.

use serde::{Deserialize, Serialize};

use super::kind::NotificationKind;
use super::model::Notification;

/// Optional type filter plus case-insensitive free text over title and content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationFilter {
    /// Restrict to one kind.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<NotificationKind>,
    /// Free-text search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl NotificationFilter {
    /// Filter by kind only.
    pub fn by_kind(kind: NotificationKind) -> Self {
        Self {
            kind: Some(kind),
            query: None,
        }
    }

    /// Filter by text only.
    pub fn by_query(query: impl Into<String>) -> Self {
        Self {
            kind: None,
            query: Some(query.into()),
        }
    }

    /// Trimmed, lowercased query; `None` when absent or blank.
    pub fn normalized_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether the filter accepts every record.
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.normalized_query().is_none()
    }

    /// Evaluate the filter against one record.
    pub fn matches(&self, notification: &Notification) -> bool {
        if let Some(kind) = self.kind {
            if notification.kind != kind {
                return false;
            }
        }
        match self.normalized_query() {
            Some(needle) => notification.contains_text(&needle),
            None => true,
        }
    }
}
