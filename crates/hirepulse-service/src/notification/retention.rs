//! Periodic notification retention.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time;
use tracing::{error, info};

use hirepulse_core::config::NotificationRetentionConfig;
use hirepulse_core::error::AppError;
use hirepulse_database::NotificationStore;

/// Outcome of one retention sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionReport {
    /// Records older than the cutoff.
    pub expired_removed: u64,
    /// Records beyond the per-user cap.
    pub overflow_removed: u64,
}

/// Deletes expired records and trims each user to the configured cap.
pub struct RetentionTask {
    store: Arc<dyn NotificationStore>,
    config: NotificationRetentionConfig,
}

impl RetentionTask {
    /// Create a retention task over the given store.
    pub fn new(store: Arc<dyn NotificationStore>, config: NotificationRetentionConfig) -> Self {
        Self { store, config }
    }

    /// Run one sweep now.
    pub async fn run_once(&self) -> Result<RetentionReport, AppError> {
        let mut report = RetentionReport::default();

        if self.config.cleanup_after_days > 0 {
            let cutoff =
                Utc::now() - chrono::Duration::days(i64::from(self.config.cleanup_after_days));
            report.expired_removed = self.store.purge_older_than(cutoff).await?;
        }

        if self.config.max_stored_per_user > 0 {
            report.overflow_removed = self
                .store
                .trim_per_user(self.config.max_stored_per_user)
                .await?;
        }

        info!(
            expired_removed = report.expired_removed,
            overflow_removed = report.overflow_removed,
            cutoff_days = self.config.cleanup_after_days,
            max_per_user = self.config.max_stored_per_user,
            "Notification retention sweep finished"
        );
        Ok(report)
    }

    /// Sweep on an interval until `shutdown` flips to `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let period = Duration::from_secs(self.config.retention_interval_seconds.max(1));
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.run_once().await {
                        error!(error = %e, "Notification retention sweep failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Notification retention task stopped");
    }
}
