//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hirepulse_core::types::NotificationId;
use hirepulse_realtime::metrics::MetricsSnapshot;

/// Count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Count value.
    pub count: u64,
}

/// Result of a single-record mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationAck {
    /// Affected record.
    pub id: NotificationId,
}

/// Result of mark-all-read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    /// Records that changed from unread to read.
    pub updated: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: i64,
}

/// Detailed health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Store backend (`postgres` or `memory`).
    pub store_backend: String,
    /// Store status.
    pub store: String,
    /// Open WebSocket connections.
    pub ws_connections: usize,
    /// Distinct users with a live connection.
    pub online_users: usize,
    /// Realtime engine counters.
    pub realtime: MetricsSnapshot,
    /// Server time.
    pub checked_at: DateTime<Utc>,
}
