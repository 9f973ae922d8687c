//! Notification record model.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hirepulse_core::types::{NotificationId, UserId};

use super::kind::NotificationKind;

/// A notification owned by exactly one user.
///
/// Everything except `is_read` is fixed at creation, and `is_read` only
/// ever moves from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The owning user.
    pub user_id: UserId,
    /// Domain event kind.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub content: String,
    /// Whether the user has read this notification.
    #[serde(default)]
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// Opaque auxiliary fields, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Notification {
    /// Check if the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }

    /// Mark as read. Returns `true` if the flag changed.
    pub fn mark_read(&mut self) -> bool {
        let changed = !self.is_read;
        self.is_read = true;
        changed
    }

    /// Case-insensitive substring match over title and content.
    ///
    /// `needle` must already be lowercase.
    pub fn contains_text(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
    }
}

/// Display order: newest first, ties broken by descending id.
pub fn display_order(a: &Notification, b: &Notification) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Sort a slice into display order.
pub fn sort_for_display(items: &mut [Notification]) {
    items.sort_by(display_order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn record(id: u128, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: NotificationId::from_uuid(Uuid::from_u128(id)),
            user_id: UserId::new(),
            kind: NotificationKind::StatusChange,
            title: "Status updated".into(),
            content: "Jane moved to Interview".into(),
            is_read: false,
            created_at,
            metadata: None,
        }
    }

    #[test]
    fn test_sort_newest_first_with_id_tiebreak() {
        let now = Utc::now();
        let mut items = vec![
            record(1, now - Duration::minutes(5)),
            record(2, now),
            record(3, now),
        ];
        sort_for_display(&mut items);
        let ids: Vec<u128> = items.iter().map(|n| n.id.0.as_u128()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_wire_shape() {
        let n = record(7, Utc::now());
        let json = serde_json::to_value(&n).expect("serialize");
        assert_eq!(json["type"], "STATUS_CHANGE");
        assert_eq!(json["isRead"], false);
        assert!(json.get("userId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_mark_read_is_monotonic() {
        let mut n = record(1, Utc::now());
        assert!(n.mark_read());
        assert!(!n.mark_read());
        assert!(n.is_read);
    }

    #[test]
    fn test_contains_text_is_case_insensitive() {
        let n = record(1, Utc::now());
        assert!(n.contains_text("interview"));
        assert!(n.contains_text(""));
        assert!(!n.contains_text("offer"));
    }
}
