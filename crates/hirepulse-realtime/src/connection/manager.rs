//! Connection manager — handles connection lifecycle (add, remove, message routing).

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use hirepulse_core::config::RealtimeConfig;
use hirepulse_core::types::{ConnectionId, UserId};
use hirepulse_entity::{ClientMessage, ServerMessage};

use crate::message::{serializer, validator};
use crate::metrics::{EngineMetrics, connections, messages};

use super::authenticator::AuthenticatedConnection;
use super::handle::ConnectionHandle;
use super::pool::ConnectionPool;

/// Manages all active WebSocket connections.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Connection pool.
    pool: Arc<ConnectionPool>,
    /// Metrics.
    metrics: Arc<EngineMetrics>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(config: RealtimeConfig, metrics: Arc<EngineMetrics>) -> Self {
        Self {
            pool: Arc::new(ConnectionPool::new()),
            metrics,
            config,
        }
    }

    /// Registers a new authenticated connection.
    ///
    /// Returns the connection handle and a receiver for outbound frames.
    /// When the user is already at the per-user cap the oldest connections
    /// are closed first.
    pub fn register(
        &self,
        auth: &AuthenticatedConnection,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));

        let handle = Arc::new(ConnectionHandle::new(
            auth.user_id,
            auth.session_id,
            auth.username.clone(),
            tx,
        ));

        let cap = self.config.max_connections_per_user.max(1);
        let existing = self.pool.get_user_connections(&auth.user_id);
        if existing.len() >= cap {
            warn!(
                user_id = %auth.user_id,
                count = existing.len(),
                max = cap,
                "User at max connections, oldest will be replaced"
            );
            let excess = existing.len() + 1 - cap;
            for oldest in existing.iter().take(excess) {
                oldest.close();
                self.pool.remove(&oldest.id);
                connections::record_eviction(&self.metrics);
                connections::record_disconnect(&self.metrics);
            }
        }

        self.pool.add(handle.clone());
        connections::record_connect(&self.metrics);

        info!(
            conn_id = %handle.id,
            user_id = %auth.user_id,
            session_id = %auth.session_id,
            "WebSocket connection registered"
        );

        (handle, rx)
    }

    /// Unregisters a connection.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.close();
            connections::record_disconnect(&self.metrics);

            info!(
                conn_id = %conn_id,
                user_id = %handle.user_id,
                "WebSocket connection unregistered"
            );
        }
    }

    /// Processes an inbound text frame from a client.
    ///
    /// `markAsRead` and `deleteNotification` are mirrors of REST calls the
    /// client already made; they are relayed to the user's other
    /// connections and never persisted here.
    pub async fn handle_inbound(&self, conn_id: &ConnectionId, raw_message: &str) {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return;
        };

        messages::record_received(&self.metrics);

        let parsed = validator::validate_inbound(raw_message, self.config.max_message_bytes)
            .and_then(|_| serializer::decode(raw_message));
        let msg = match parsed {
            Ok(m) => m,
            Err(e) => {
                messages::record_rejected(&self.metrics);
                debug!(conn_id = %conn_id, error = %e, "Rejected inbound frame");
                self.reply(&handle, &ServerMessage::error("INVALID_MESSAGE", e.message));
                return;
            }
        };

        match msg {
            ClientMessage::Pong { .. } => {
                handle.record_pong().await;
            }
            ClientMessage::MarkAsRead { id } => {
                debug!(conn_id = %conn_id, notification_id = %id, "Relaying read mirror");
                self.send_to_user_except(
                    &handle.user_id,
                    conn_id,
                    &ServerMessage::NotificationRead { id },
                );
            }
            ClientMessage::DeleteNotification { id } => {
                debug!(conn_id = %conn_id, notification_id = %id, "Relaying delete mirror");
                self.send_to_user_except(
                    &handle.user_id,
                    conn_id,
                    &ServerMessage::NotificationDeleted { id },
                );
            }
        }
    }

    fn reply(&self, handle: &ConnectionHandle, message: &ServerMessage) {
        match serializer::encode(message) {
            Ok(frame) => {
                if handle.send(frame) {
                    messages::record_sent(&self.metrics, 1);
                }
            }
            Err(e) => error!(error = %e, "Failed to serialize reply"),
        }
    }

    /// Sends a frame to every connection of a user. Returns how many
    /// connections accepted it.
    pub fn send_to_user(&self, user_id: &UserId, message: &ServerMessage) -> usize {
        self.fan_out(user_id, None, message)
    }

    /// Sends a frame to every connection of a user except `origin`.
    pub fn send_to_user_except(
        &self,
        user_id: &UserId,
        origin: &ConnectionId,
        message: &ServerMessage,
    ) -> usize {
        self.fan_out(user_id, Some(origin), message)
    }

    fn fan_out(
        &self,
        user_id: &UserId,
        skip: Option<&ConnectionId>,
        message: &ServerMessage,
    ) -> usize {
        let targets = self.pool.get_user_connections(user_id);
        if targets.is_empty() {
            return 0;
        }

        let frame = match serializer::encode(message) {
            Ok(f) => f,
            Err(e) => {
                error!(error = %e, "Failed to serialize outbound message");
                return 0;
            }
        };

        let delivered = targets
            .iter()
            .filter(|conn| Some(&conn.id) != skip)
            .filter(|conn| conn.send(frame.clone()))
            .count();

        messages::record_sent(&self.metrics, delivered);
        debug!(
            user_id = %user_id,
            event = message.event_name(),
            delivered,
            "Fanned out frame"
        );
        delivered
    }

    /// Closes all connections.
    pub fn close_all(&self) {
        let all = self.pool.all_connections();
        for conn in &all {
            conn.close();
            self.pool.remove(&conn.id);
            connections::record_disconnect(&self.metrics);
        }
        info!(count = all.len(), "All connections closed");
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Returns the number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }

    /// Returns the realtime configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }
}
