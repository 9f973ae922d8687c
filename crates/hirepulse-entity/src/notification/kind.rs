//! Notification type enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use hirepulse_core::AppError;

/// Closed set of domain event kinds a notification can originate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// A candidate applied to a job posting.
    NewApplication,
    /// An application moved to another pipeline stage.
    StatusChange,
    /// AI evaluation of a candidate finished.
    AiAnalysisComplete,
    /// Resume or evaluation processing failed.
    ProcessingFailed,
    /// A candidate was shortlisted.
    CandidateShortlisted,
    /// The bias monitor flagged an evaluation.
    BiasAlert,
    /// A candidate appears to be a duplicate.
    DuplicateCandidate,
    /// A bulk upload batch finished.
    BulkProcessingComplete,
    /// An unexpected system failure.
    SystemError,
    /// Security-relevant activity.
    SecurityAlert,
    /// A health metric crossed its threshold.
    HealthMetricsAlert,
    /// Latency or throughput regressed.
    PerformanceDegradation,
    /// A user reached a usage milestone.
    UserMilestoneReached,
    /// A processing batch reached a milestone.
    ProcessingMilestone,
    /// The monthly analytics report is ready.
    MonthlyAnalyticsReport,
}

impl NotificationKind {
    /// Every kind, in declaration order.
    pub const ALL: [NotificationKind; 15] = [
        Self::NewApplication,
        Self::StatusChange,
        Self::AiAnalysisComplete,
        Self::ProcessingFailed,
        Self::CandidateShortlisted,
        Self::BiasAlert,
        Self::DuplicateCandidate,
        Self::BulkProcessingComplete,
        Self::SystemError,
        Self::SecurityAlert,
        Self::HealthMetricsAlert,
        Self::PerformanceDegradation,
        Self::UserMilestoneReached,
        Self::ProcessingMilestone,
        Self::MonthlyAnalyticsReport,
    ];

    /// Return the wire/storage string for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewApplication => "NEW_APPLICATION",
            Self::StatusChange => "STATUS_CHANGE",
            Self::AiAnalysisComplete => "AI_ANALYSIS_COMPLETE",
            Self::ProcessingFailed => "PROCESSING_FAILED",
            Self::CandidateShortlisted => "CANDIDATE_SHORTLISTED",
            Self::BiasAlert => "BIAS_ALERT",
            Self::DuplicateCandidate => "DUPLICATE_CANDIDATE",
            Self::BulkProcessingComplete => "BULK_PROCESSING_COMPLETE",
            Self::SystemError => "SYSTEM_ERROR",
            Self::SecurityAlert => "SECURITY_ALERT",
            Self::HealthMetricsAlert => "HEALTH_METRICS_ALERT",
            Self::PerformanceDegradation => "PERFORMANCE_DEGRADATION",
            Self::UserMilestoneReached => "USER_MILESTONE_REACHED",
            Self::ProcessingMilestone => "PROCESSING_MILESTONE",
            Self::MonthlyAnalyticsReport => "MONTHLY_ANALYTICS_REPORT",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown notification type '{s}'")))
    }
}
