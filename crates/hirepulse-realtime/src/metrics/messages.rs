//! Message metrics helpers.

use std::sync::atomic::Ordering;

use super::EngineMetrics;

/// Record frames queued to clients
pub fn record_sent(metrics: &EngineMetrics, count: usize) {
    metrics
        .messages_sent
        .fetch_add(count as u64, Ordering::Relaxed);
}

/// Record a frame received from a client
pub fn record_received(metrics: &EngineMetrics) {
    metrics.messages_received.fetch_add(1, Ordering::Relaxed);
}

/// Record a rejected inbound frame
pub fn record_rejected(metrics: &EngineMetrics) {
    metrics.messages_rejected.fetch_add(1, Ordering::Relaxed);
}
