//! Notification dispatcher — pushes state changes to the owner's live sessions.

use std::sync::Arc;

use hirepulse_core::types::UserId;
use hirepulse_entity::{Notification, ServerMessage};

use crate::connection::manager::ConnectionManager;

/// Pushes notification changes to every connection of the owning user.
///
/// Delivery is best effort: an offline user simply receives nothing and
/// picks the change up on the next REST fetch.
#[derive(Debug)]
pub struct NotificationDispatcher {
    /// Connection manager for sending WS frames
    connections: Arc<ConnectionManager>,
}

impl NotificationDispatcher {
    /// Create a new dispatcher
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self { connections }
    }

    /// Push a newly created record to its owner.
    pub fn push_new(&self, notification: &Notification) -> usize {
        let delivered = self.connections.send_to_user(
            &notification.user_id,
            &ServerMessage::NotificationNew(notification.clone()),
        );
        tracing::debug!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            kind = %notification.kind,
            delivered,
            "Pushed new notification"
        );
        delivered
    }

    /// Tell a user's sessions that everything was marked read.
    pub fn push_all_read(&self, user_id: UserId) -> usize {
        self.connections
            .send_to_user(&user_id, &ServerMessage::NotificationAllRead { user_id })
    }
}
