//! Ping/pong heartbeat for WebSocket keepalive.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time;

use hirepulse_core::config::RealtimeConfig;
use hirepulse_entity::ServerMessage;

use super::handle::ConnectionHandle;
use crate::message::serializer;
use crate::metrics::{EngineMetrics, connections};

/// Heartbeat configuration
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Interval between pings
    pub ping_interval: Duration,
    /// Timeout before considering connection dead
    pub ping_timeout: Duration,
}

impl From<&RealtimeConfig> for HeartbeatConfig {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: Duration::from_secs(config.ping_interval_seconds.max(1)),
            ping_timeout: Duration::from_secs(config.ping_timeout_seconds.max(1)),
        }
    }
}

/// Run heartbeat loop for a connection.
///
/// Sends periodic pings and closes the connection once no pong has been
/// seen for longer than the timeout.
pub async fn run_heartbeat(
    handle: Arc<ConnectionHandle>,
    config: HeartbeatConfig,
    metrics: Arc<EngineMetrics>,
) {
    let mut interval = time::interval(config.ping_interval);
    // First tick fires immediately.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = handle.closed() => break,
        }

        if !handle.is_alive() {
            break;
        }

        let last_pong = *handle.last_pong.read().await;
        let elapsed = last_pong.elapsed();

        if elapsed > config.ping_timeout {
            tracing::warn!(
                conn_id = %handle.id,
                user_id = %handle.user_id,
                "Heartbeat timeout (last pong {:?} ago)",
                elapsed
            );
            connections::record_heartbeat_timeout(&metrics);
            handle.close();
            break;
        }

        let ping = ServerMessage::Ping {
            timestamp: Utc::now().timestamp_millis(),
        };
        let sent = serializer::encode(&ping)
            .map(|frame| handle.send(frame))
            .unwrap_or(false);
        if !sent && !handle.is_alive() {
            tracing::debug!(conn_id = %handle.id, "Ping send failed, closing");
            handle.close();
            break;
        }
    }

    tracing::debug!(conn_id = %handle.id, "Heartbeat loop ended");
}
