//! In-process notification store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use hirepulse_core::error::AppError;
use hirepulse_core::result::AppResult;
use hirepulse_core::types::{NotificationId, PageRequest, PageResponse, UserId};
use hirepulse_entity::notification::{
    NewNotification, Notification, NotificationFilter, sort_for_display,
};

use crate::store::NotificationStore;

/// Notification store kept in a process-local map.
///
/// Mirrors the PostgreSQL repository's semantics exactly; contents are
/// lost on restart.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    records: RwLock<HashMap<NotificationId, Notification>>,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed record, replacing any record with the same id.
    ///
    /// Used to seed fixtures with controlled timestamps.
    pub async fn insert(&self, notification: Notification) {
        self.records
            .write()
            .await
            .insert(notification.id, notification);
    }

    /// Total records across all users.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn not_found(id: NotificationId) -> AppError {
    AppError::not_found(format!("Notification {id} not found"))
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn create(&self, new: NewNotification) -> AppResult<Notification> {
        new.check()?;
        let record = new.into_record(Utc::now());
        self.records
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(
        &self,
        user_id: UserId,
        id: NotificationId,
    ) -> AppResult<Option<Notification>> {
        Ok(self
            .records
            .read()
            .await
            .get(&id)
            .filter(|n| n.user_id == user_id)
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
        filter: &NotificationFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let mut matching: Vec<Notification> = self
            .records
            .read()
            .await
            .values()
            .filter(|n| n.user_id == user_id && filter.matches(n))
            .cloned()
            .collect();
        sort_for_display(&mut matching);

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn mark_read(&self, user_id: UserId, id: NotificationId) -> AppResult<()> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(n) if n.user_id == user_id => {
                n.mark_read();
                Ok(())
            }
            _ => Err(not_found(id)),
        }
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let changed = records
            .values_mut()
            .filter(|n| n.user_id == user_id)
            .map(|n| n.mark_read())
            .filter(|changed| *changed)
            .count();
        Ok(changed as u64)
    }

    async fn delete(&self, user_id: UserId, id: NotificationId) -> AppResult<()> {
        let mut records = self.records.write().await;
        let owned = records.get(&id).is_some_and(|n| n.user_id == user_id);
        if !owned {
            return Err(not_found(id));
        }
        records.remove(&id);
        Ok(())
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<u64> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|n| n.user_id == user_id && n.is_unread())
            .count() as u64)
    }

    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, n| n.created_at >= cutoff);
        let removed = (before - records.len()) as u64;
        debug!(removed, %cutoff, "Purged notifications from memory store");
        Ok(removed)
    }

    async fn trim_per_user(&self, limit: u64) -> AppResult<u64> {
        let mut records = self.records.write().await;

        let mut by_user: HashMap<UserId, Vec<Notification>> = HashMap::new();
        for n in records.values() {
            by_user.entry(n.user_id).or_default().push(n.clone());
        }

        let mut removed = 0u64;
        for (_, mut items) in by_user {
            sort_for_display(&mut items);
            for stale in items.iter().skip(limit as usize) {
                records.remove(&stale.id);
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use hirepulse_core::error::ErrorKind;
    use hirepulse_entity::notification::NotificationKind;

    fn new_for(user_id: UserId, kind: NotificationKind, title: &str) -> NewNotification {
        NewNotification {
            user_id,
            kind,
            title: title.to_string(),
            content: format!("{title} details"),
            metadata: None,
        }
    }

    fn seeded(user_id: UserId, minutes_ago: i64) -> Notification {
        new_for(user_id, NotificationKind::StatusChange, "Status")
            .into_record(Utc::now() - Duration::minutes(minutes_ago))
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let store = MemoryNotificationStore::new();
        let err = store
            .create(new_for(UserId::new(), NotificationKind::BiasAlert, ""))
            .await
            .expect_err("empty title");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let store = MemoryNotificationStore::new();
        let user = UserId::new();
        let older = seeded(user, 10);
        let newer = seeded(user, 1);
        store.insert(older.clone()).await;
        store.insert(newer.clone()).await;
        store
            .create(new_for(user, NotificationKind::BiasAlert, "Bias Alert"))
            .await
            .expect("create");
        store
            .create(new_for(UserId::new(), NotificationKind::BiasAlert, "Bias Alert"))
            .await
            .expect("create for other user");

        let all = store
            .list_by_user(user, &NotificationFilter::default(), PageRequest::default())
            .await
            .expect("list");
        assert_eq!(all.total, 3);
        assert_eq!(all.items[1].id, newer.id);
        assert_eq!(all.items[2].id, older.id);

        let bias = store
            .list_by_user(user, &NotificationFilter::by_query("bIaS"), PageRequest::default())
            .await
            .expect("search");
        assert_eq!(bias.total, 1);
        assert_eq!(bias.items[0].kind, NotificationKind::BiasAlert);
    }

    #[tokio::test]
    async fn test_pagination_reports_totals() {
        let store = MemoryNotificationStore::new();
        let user = UserId::new();
        for minutes in 0..5 {
            store.insert(seeded(user, minutes)).await;
        }
        let page = store
            .list_by_user(user, &NotificationFilter::default(), PageRequest::new(3, 2))
            .await
            .expect("list");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent_and_user_scoped() {
        let store = MemoryNotificationStore::new();
        let user = UserId::new();
        let n = store
            .create(new_for(user, NotificationKind::SecurityAlert, "Login"))
            .await
            .expect("create");

        let err = store.mark_read(UserId::new(), n.id).await.expect_err("foreign");
        assert_eq!(err.kind, ErrorKind::NotFound);

        store.mark_read(user, n.id).await.expect("first");
        store.mark_read(user, n.id).await.expect("second");
        assert_eq!(store.count_unread(user).await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_mark_all_read_counts_changes() {
        let store = MemoryNotificationStore::new();
        let user = UserId::new();
        for minutes in 0..3 {
            store.insert(seeded(user, minutes)).await;
        }
        assert_eq!(store.mark_all_read(user).await.expect("first"), 3);
        assert_eq!(store.mark_all_read(user).await.expect("second"), 0);
    }

    #[tokio::test]
    async fn test_second_delete_is_not_found() {
        let store = MemoryNotificationStore::new();
        let user = UserId::new();
        let n = store
            .create(new_for(user, NotificationKind::SystemError, "Oops"))
            .await
            .expect("create");
        store.delete(user, n.id).await.expect("delete");
        let err = store.delete(user, n.id).await.expect_err("again");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_retention_helpers() {
        let store = MemoryNotificationStore::new();
        let user = UserId::new();
        let other = UserId::new();
        for minutes in [1, 2, 3, 600] {
            store.insert(seeded(user, minutes)).await;
        }
        store.insert(seeded(other, 1)).await;

        let purged = store
            .purge_older_than(Utc::now() - Duration::hours(1))
            .await
            .expect("purge");
        assert_eq!(purged, 1);

        let trimmed = store.trim_per_user(2).await.expect("trim");
        assert_eq!(trimmed, 1);
        assert_eq!(store.len().await, 3);
    }
}
