//! Exponential reconnect delay.

use std::time::Duration;

use hirepulse_core::config::ClientConfig;

/// Doubling delay from `base_ms`, capped at `max_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base_ms: u64,
    pub max_ms: u64,
}

impl ReconnectPolicy {
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        let base_ms = base_ms.max(1);
        Self {
            base_ms,
            max_ms: max_ms.max(base_ms),
        }
    }

    /// Delay before retry number `attempt` (0-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let scaled = self.base_ms.saturating_mul(1_u64 << exponent);
        Duration::from_millis(scaled.min(self.max_ms))
    }
}

impl From<&ClientConfig> for ReconnectPolicy {
    fn from(config: &ClientConfig) -> Self {
        Self::new(config.reconnect_base_ms, config.reconnect_max_ms)
    }
}
