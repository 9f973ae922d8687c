//! Event bridge metrics helpers.

use std::sync::atomic::Ordering;

use super::EngineMetrics;

/// Record an event handed to the bridge
pub fn record_event(metrics: &EngineMetrics) {
    metrics.events_received.fetch_add(1, Ordering::Relaxed);
}

/// Record an event persisted as a notification
pub fn record_created(metrics: &EngineMetrics) {
    metrics.notifications_created.fetch_add(1, Ordering::Relaxed);
}

/// Record an event that was dropped
pub fn record_rejected(metrics: &EngineMetrics) {
    metrics.events_rejected.fetch_add(1, Ordering::Relaxed);
}
