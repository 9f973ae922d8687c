//! Top-level real-time engine that ties together all subsystems.

use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use hirepulse_auth::jwt::JwtDecoder;
use hirepulse_core::config::RealtimeConfig;
use hirepulse_core::error::AppError;
use hirepulse_entity::NotificationEvent;
use hirepulse_service::NotificationService;

use crate::bridge::emitter::{EventEmitter, spawn_event_consumer};
use crate::bridge::event_bridge::EventBridge;
use crate::connection::authenticator::WsAuthenticator;
use crate::connection::heartbeat::HeartbeatConfig;
use crate::connection::manager::ConnectionManager;
use crate::metrics::EngineMetrics;
use crate::notification::dispatcher::NotificationDispatcher;

/// Central real-time engine that coordinates all WebSocket subsystems.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Notification dispatcher.
    pub notifications: Arc<NotificationDispatcher>,
    /// Event bridge (domain events → notifications).
    pub event_bridge: Arc<EventBridge>,
    /// Producer handle feeding the bridge.
    pub emitter: EventEmitter,
    /// Handshake authenticator.
    pub authenticator: WsAuthenticator,
    /// Metrics collector.
    pub metrics: Arc<EngineMetrics>,
    heartbeat: HeartbeatConfig,
    /// Receiver handed to the consumer on `start`.
    pending_events: Arc<Mutex<Option<mpsc::Receiver<NotificationEvent>>>>,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(
        config: RealtimeConfig,
        notification_service: Arc<NotificationService>,
        jwt_decoder: Arc<JwtDecoder>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let metrics = Arc::new(EngineMetrics::new());
        let heartbeat = HeartbeatConfig::from(&config);
        let (emitter, events_rx) = EventEmitter::channel(config.event_queue_size);
        let connections = Arc::new(ConnectionManager::new(config, metrics.clone()));
        let notifications = Arc::new(NotificationDispatcher::new(connections.clone()));
        let event_bridge = Arc::new(EventBridge::new(
            notification_service,
            notifications.clone(),
            metrics.clone(),
        ));

        info!("Real-time engine initialized");

        Self {
            connections,
            notifications,
            event_bridge,
            emitter,
            authenticator: WsAuthenticator::new(jwt_decoder),
            metrics,
            heartbeat,
            pending_events: Arc::new(Mutex::new(Some(events_rx))),
            shutdown_tx,
        }
    }

    /// Starts the event consumer. Returns `None` if already started.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        let rx = match self.pending_events.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(rx) = rx else {
            warn!("Real-time engine already started");
            return None;
        };
        Some(spawn_event_consumer(
            self.event_bridge.clone(),
            rx,
            self.shutdown_tx.subscribe(),
        ))
    }

    /// Heartbeat settings for new connections.
    pub fn heartbeat_config(&self) -> HeartbeatConfig {
        self.heartbeat.clone()
    }

    /// Initiates a graceful shutdown of the real-time engine.
    pub fn shutdown(&self) -> Result<(), AppError> {
        info!("Shutting down real-time engine");

        let _ = self.shutdown_tx.send(());
        self.connections.close_all();

        info!("Real-time engine shut down");
        Ok(())
    }
}
