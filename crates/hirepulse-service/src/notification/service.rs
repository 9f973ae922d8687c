//! Notification queries and user-scoped mutations.

use std::sync::Arc;

use tracing::{debug, info};

use hirepulse_core::error::AppError;
use hirepulse_core::types::{NotificationId, PageRequest, PageResponse};
use hirepulse_database::NotificationStore;
use hirepulse_entity::notification::{NewNotification, Notification, NotificationFilter};

use crate::context::RequestContext;

/// Manages the current user's notifications.
#[derive(Clone)]
pub struct NotificationService {
    /// Notification store.
    store: Arc<dyn NotificationStore>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("backend", &self.store.backend())
            .finish()
    }
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Underlying store, shared with the event bridge and retention task.
    pub fn store(&self) -> &Arc<dyn NotificationStore> {
        &self.store
    }

    /// Lists notifications for the current user.
    pub async fn list_notifications(
        &self,
        ctx: &RequestContext,
        filter: &NotificationFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Notification>, AppError> {
        self.store.list_by_user(ctx.user_id, filter, page).await
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        self.store.count_unread(ctx.user_id).await
    }

    /// Marks a notification as read.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: NotificationId,
    ) -> Result<(), AppError> {
        self.store.mark_read(ctx.user_id, notification_id).await?;
        debug!(user_id = %ctx.user_id, %notification_id, "Notification marked read");
        Ok(())
    }

    /// Marks all notifications as read for the current user.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        let changed = self.store.mark_all_read(ctx.user_id).await?;
        info!(user_id = %ctx.user_id, session_id = %ctx.session_id, changed, "All notifications marked read");
        Ok(changed)
    }

    /// Permanently deletes a notification.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        notification_id: NotificationId,
    ) -> Result<(), AppError> {
        self.store.delete(ctx.user_id, notification_id).await?;
        info!(
            user_id = %ctx.user_id,
            username = %ctx.username,
            %notification_id,
            "Notification deleted"
        );
        Ok(())
    }

    /// Persists a new notification. Only the event bridge calls this.
    pub async fn create_notification(
        &self,
        new: NewNotification,
    ) -> Result<Notification, AppError> {
        self.store.create(new).await
    }
}
