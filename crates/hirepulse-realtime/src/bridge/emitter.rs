//! Fire-and-forget event intake for producers.
//!
//! Producers hold a cloneable [`EventEmitter`]; a single consumer task feeds
//! the [`EventBridge`] in arrival order, so events from one producer reach
//! the store in the order they were emitted.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use hirepulse_core::error::AppError;
use hirepulse_entity::NotificationEvent;

use super::event_bridge::EventBridge;

/// Cloneable handle for submitting domain events.
#[derive(Debug, Clone)]
pub struct EventEmitter {
    tx: mpsc::Sender<NotificationEvent>,
}

impl EventEmitter {
    /// Create an emitter and the receiving end for the consumer.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<NotificationEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Queue an event, waiting for room if the queue is full.
    pub async fn emit(&self, event: NotificationEvent) -> Result<(), AppError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| AppError::internal("Notification event queue is closed"))
    }
}

/// Spawn the task draining emitted events into the bridge until shutdown.
///
/// Events still queued when the producers drop their emitters are
/// processed before the task exits.
pub fn spawn_event_consumer(
    bridge: Arc<EventBridge>,
    mut rx: mpsc::Receiver<NotificationEvent>,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Notification event consumer started");
        loop {
            tokio::select! {
                maybe = rx.recv() => {
                    let Some(event) = maybe else { break };
                    // Failures are logged by the bridge.
                    if let Err(e) = bridge.emit(event).await {
                        debug!(error = %e, "Event not delivered");
                    }
                }
                _ = shutdown.recv() => break,
            }
        }
        info!("Notification event consumer stopped");
    })
}
