//! Realtime engine metrics.

pub mod connections;
pub mod events;
pub mod messages;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Total connections established
    pub connections_total: AtomicU64,
    /// Connections currently open
    pub connections_active: AtomicU64,
    /// Connections closed to make room under the per-user cap
    pub connections_evicted: AtomicU64,
    /// Connections closed for missing pongs
    pub heartbeat_timeouts: AtomicU64,
    /// Frames queued to clients
    pub messages_sent: AtomicU64,
    /// Frames received from clients
    pub messages_received: AtomicU64,
    /// Inbound frames rejected as malformed or oversized
    pub messages_rejected: AtomicU64,
    /// Domain events handed to the bridge
    pub events_received: AtomicU64,
    /// Events persisted as notifications
    pub notifications_created: AtomicU64,
    /// Events dropped because they failed validation or storage
    pub events_rejected: AtomicU64,
}

impl EngineMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            connections_evicted: self.connections_evicted.load(Ordering::Relaxed),
            heartbeat_timeouts: self.heartbeat_timeouts.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_rejected: self.messages_rejected.load(Ordering::Relaxed),
            events_received: self.events_received.load(Ordering::Relaxed),
            notifications_created: self.notifications_created.load(Ordering::Relaxed),
            events_rejected: self.events_rejected.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub connections_total: u64,
    pub connections_active: u64,
    pub connections_evicted: u64,
    pub heartbeat_timeouts: u64,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub messages_rejected: u64,
    pub events_received: u64,
    pub notifications_created: u64,
    pub events_rejected: u64,
}
