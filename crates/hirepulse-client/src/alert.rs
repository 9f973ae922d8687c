//! Alert side effects for newly pushed notifications.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use hirepulse_core::result::AppResult;
use hirepulse_entity::{Notification, NotificationKind};

/// Sound family played for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertTone {
    Success,
    Error,
    Warning,
    Info,
}

impl AlertTone {
    /// Tone for a notification kind.
    pub fn for_kind(kind: NotificationKind) -> Self {
        use NotificationKind::*;
        match kind {
            AiAnalysisComplete
            | BulkProcessingComplete
            | CandidateShortlisted
            | UserMilestoneReached
            | ProcessingMilestone => Self::Success,
            ProcessingFailed | SystemError | SecurityAlert => Self::Error,
            BiasAlert | DuplicateCandidate | HealthMetricsAlert | PerformanceDegradation => {
                Self::Warning
            }
            NewApplication | StatusChange | MonthlyAnalyticsReport => Self::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for AlertTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output device for alerts.
pub trait AlertSink: Send + Sync + 'static {
    fn play(&self, tone: AlertTone, notification: &Notification) -> AppResult<()>;
}

/// Sink that only logs. Used where no audio device exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn play(&self, tone: AlertTone, notification: &Notification) -> AppResult<()> {
        info!(
            tone = %tone,
            notification_id = %notification.id,
            kind = %notification.kind,
            title = %notification.title,
            "Notification alert"
        );
        Ok(())
    }
}

/// Plays a tone for every new notification while enabled.
pub struct AlertAdapter {
    sink: Arc<dyn AlertSink>,
    enabled: AtomicBool,
}

impl fmt::Debug for AlertAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertAdapter")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl AlertAdapter {
    pub fn new(sink: Arc<dyn AlertSink>, enabled: bool) -> Self {
        Self {
            sink,
            enabled: AtomicBool::new(enabled),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Play the tone for one notification. Playback errors are logged.
    ///
    /// Returns the tone played, if any.
    pub fn handle(&self, notification: &Notification) -> Option<AlertTone> {
        if !self.is_enabled() {
            return None;
        }
        let tone = AlertTone::for_kind(notification.kind);
        match self.sink.play(tone, notification) {
            Ok(()) => Some(tone),
            Err(e) => {
                warn!(notification_id = %notification.id, error = %e, "Alert playback failed");
                None
            }
        }
    }

    /// Consume the store's new-notification signal until cancelled.
    pub fn spawn(
        self: Arc<Self>,
        mut rx: broadcast::Receiver<Notification>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    received = rx.recv() => match received {
                        Ok(notification) => {
                            self.handle(&notification);
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            debug!(skipped, "Alert adapter lagged behind");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        })
    }
}
