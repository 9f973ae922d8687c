//! Real-time WebSocket engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Maximum WebSocket connections per user; the oldest is evicted beyond this.
    #[serde(default = "default_max_connections_per_user")]
    pub max_connections_per_user: usize,
    /// Outbound buffer size of each connection.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Heartbeat ping interval in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Seconds without a pong before a connection is dropped.
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout_seconds: u64,
    /// Largest accepted inbound frame in bytes.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
    /// Capacity of the domain event queue feeding the event bridge.
    #[serde(default = "default_event_queue")]
    pub event_queue_size: usize,
    /// Stored notification retention settings.
    #[serde(default)]
    pub notifications: NotificationRetentionConfig,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            max_connections_per_user: default_max_connections_per_user(),
            channel_buffer_size: default_channel_buffer(),
            ping_interval_seconds: default_ping_interval(),
            ping_timeout_seconds: default_ping_timeout(),
            max_message_bytes: default_max_message_bytes(),
            event_queue_size: default_event_queue(),
            notifications: NotificationRetentionConfig::default(),
        }
    }
}

/// Retention policy for stored notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRetentionConfig {
    /// Maximum stored notifications per user (0 disables trimming).
    #[serde(default = "default_max_stored")]
    pub max_stored_per_user: u64,
    /// Number of days after which stored notifications are purged (0 disables).
    #[serde(default = "default_cleanup_days")]
    pub cleanup_after_days: u32,
    /// Interval between retention sweeps in seconds.
    #[serde(default = "default_retention_interval")]
    pub retention_interval_seconds: u64,
}

impl Default for NotificationRetentionConfig {
    fn default() -> Self {
        Self {
            max_stored_per_user: default_max_stored(),
            cleanup_after_days: default_cleanup_days(),
            retention_interval_seconds: default_retention_interval(),
        }
    }
}

fn default_max_connections_per_user() -> usize {
    5
}

fn default_channel_buffer() -> usize {
    256
}

fn default_ping_interval() -> u64 {
    30
}

fn default_ping_timeout() -> u64 {
    90
}

fn default_max_message_bytes() -> usize {
    16 * 1024
}

fn default_event_queue() -> usize {
    1024
}

fn default_max_stored() -> u64 {
    500
}

fn default_cleanup_days() -> u32 {
    90
}

fn default_retention_interval() -> u64 {
    3600
}
