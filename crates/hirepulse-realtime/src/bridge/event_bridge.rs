//! Domain event → notification mapping.
//!
//! Every event is validated, persisted through the notification service,
//! and only then pushed to the owner's connected sessions.

use std::sync::Arc;

use tracing::{info, warn};

use hirepulse_core::result::AppResult;
use hirepulse_entity::{Notification, NotificationEvent};
use hirepulse_service::NotificationService;

use crate::metrics::{EngineMetrics, events};
use crate::notification::dispatcher::NotificationDispatcher;

/// Bridges domain events into the realtime system.
#[derive(Debug)]
pub struct EventBridge {
    /// Persistence
    notifications: Arc<NotificationService>,
    /// Live fan-out
    dispatcher: Arc<NotificationDispatcher>,
    metrics: Arc<EngineMetrics>,
}

impl EventBridge {
    /// Create a new event bridge
    pub fn new(
        notifications: Arc<NotificationService>,
        dispatcher: Arc<NotificationDispatcher>,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            notifications,
            dispatcher,
            metrics,
        }
    }

    /// Persist an event as a notification and push it to the owner.
    ///
    /// A rejected event creates nothing and pushes nothing.
    pub async fn emit(&self, event: NotificationEvent) -> AppResult<Notification> {
        events::record_event(&self.metrics);
        let user_id = event.user_id;
        let kind = event.kind;

        let created = match event.into_new() {
            Ok(new) => self.notifications.create_notification(new).await,
            Err(e) => Err(e),
        };

        let notification = match created {
            Ok(n) => n,
            Err(e) => {
                events::record_rejected(&self.metrics);
                warn!(user_id = %user_id, kind = %kind, error = %e, "Dropped notification event");
                return Err(e);
            }
        };

        events::record_created(&self.metrics);
        let delivered = self.dispatcher.push_new(&notification);
        info!(
            notification_id = %notification.id,
            user_id = %user_id,
            kind = %kind,
            delivered,
            "Notification emitted"
        );
        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hirepulse_core::config::RealtimeConfig;
    use hirepulse_core::types::{SessionId, UserId};
    use hirepulse_database::MemoryNotificationStore;
    use hirepulse_entity::{NotificationKind, ServerMessage};
    use uuid::Uuid;

    use crate::connection::authenticator::AuthenticatedConnection;
    use crate::connection::manager::ConnectionManager;

    struct Fixture {
        bridge: EventBridge,
        connections: Arc<ConnectionManager>,
        store: Arc<MemoryNotificationStore>,
    }

    fn fixture() -> Fixture {
        let metrics = Arc::new(EngineMetrics::new());
        let store = Arc::new(MemoryNotificationStore::new());
        let service = Arc::new(NotificationService::new(store.clone()));
        let connections = Arc::new(ConnectionManager::new(
            RealtimeConfig::default(),
            metrics.clone(),
        ));
        let dispatcher = Arc::new(NotificationDispatcher::new(connections.clone()));
        Fixture {
            bridge: EventBridge::new(service, dispatcher, metrics),
            connections,
            store,
        }
    }

    #[tokio::test]
    async fn test_emit_persists_then_pushes() {
        let fx = fixture();
        let user = UserId::new();
        let (_conn, mut rx) = fx.connections.register(&AuthenticatedConnection {
            user_id: user,
            session_id: SessionId::new(),
            username: "hr".into(),
        });

        let created = fx
            .bridge
            .emit(NotificationEvent::bias_alert(user, "Data Engineer", Uuid::new_v4()))
            .await
            .expect("emit");

        assert_eq!(created.kind, NotificationKind::BiasAlert);
        assert_eq!(fx.store.len().await, 1);
        let frame = rx.try_recv().expect("pushed");
        assert_eq!(
            ServerMessage::from_json(&frame).expect("decode"),
            ServerMessage::NotificationNew(created)
        );
    }

    #[tokio::test]
    async fn test_invalid_event_creates_nothing() {
        let fx = fixture();
        let user = UserId::new();
        let (_conn, mut rx) = fx.connections.register(&AuthenticatedConnection {
            user_id: user,
            session_id: SessionId::new(),
            username: "hr".into(),
        });

        let event = NotificationEvent::new(user, NotificationKind::SystemError, "  ", "body");
        assert!(fx.bridge.emit(event).await.is_err());
        assert!(fx.store.is_empty().await);
        assert!(rx.try_recv().is_err());
    }
}
