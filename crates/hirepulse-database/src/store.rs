//! The notification store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use hirepulse_core::AppResult;
use hirepulse_core::types::{NotificationId, PageRequest, PageResponse, UserId};
use hirepulse_entity::notification::{NewNotification, Notification, NotificationFilter};

/// Durable source of truth for notification records and their read state.
///
/// All mutating operations are scoped to the owning user: an id owned by
/// someone else behaves exactly like an unknown id.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Persist a new unread record. Fails with `Validation` on bad input.
    async fn create(&self, new: NewNotification) -> AppResult<Notification>;

    /// Fetch one record owned by `user_id`.
    async fn find_by_id(
        &self,
        user_id: UserId,
        id: NotificationId,
    ) -> AppResult<Option<Notification>>;

    /// List a user's records, newest first with id tiebreak.
    async fn list_by_user(
        &self,
        user_id: UserId,
        filter: &NotificationFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Mark one record read. Idempotent; `NotFound` for unknown ids.
    async fn mark_read(&self, user_id: UserId, id: NotificationId) -> AppResult<()>;

    /// Mark every unread record of the user read. Returns rows changed.
    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64>;

    /// Permanently delete a record. `NotFound` if unknown, including a repeat delete.
    async fn delete(&self, user_id: UserId, id: NotificationId) -> AppResult<()>;

    /// Number of unread records of the user.
    async fn count_unread(&self, user_id: UserId) -> AppResult<u64>;

    /// Delete every record created before `cutoff`. Returns rows removed.
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;

    /// Keep only the newest `limit` records of each user. Returns rows removed.
    async fn trim_per_user(&self, limit: u64) -> AppResult<u64>;

    /// Check backend connectivity.
    async fn health_check(&self) -> AppResult<bool>;

    /// Short backend name for diagnostics.
    fn backend(&self) -> &'static str;
}
