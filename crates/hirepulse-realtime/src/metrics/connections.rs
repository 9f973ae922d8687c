//! Connection metrics helpers.

use std::sync::atomic::Ordering;

use super::EngineMetrics;

/// Record a new connection
pub fn record_connect(metrics: &EngineMetrics) {
    metrics.connections_total.fetch_add(1, Ordering::Relaxed);
    metrics.connections_active.fetch_add(1, Ordering::Relaxed);
}

/// Record a disconnection
pub fn record_disconnect(metrics: &EngineMetrics) {
    let _ = metrics
        .connections_active
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_sub(1));
}

/// Record an eviction under the per-user cap
pub fn record_eviction(metrics: &EngineMetrics) {
    metrics.connections_evicted.fetch_add(1, Ordering::Relaxed);
}

/// Record a heartbeat timeout
pub fn record_heartbeat_timeout(metrics: &EngineMetrics) {
    metrics.heartbeat_timeouts.fetch_add(1, Ordering::Relaxed);
}
