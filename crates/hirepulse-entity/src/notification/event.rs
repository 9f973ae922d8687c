//! Producer-side domain event input.
//!
//! Other subsystems (application intake, AI evaluation, monitoring) describe
//! what happened with a [`NotificationEvent`]. Metadata is typed here and
//! flattened into opaque JSON once the event becomes a record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hirepulse_core::AppResult;
use hirepulse_core::types::UserId;

use super::kind::NotificationKind;
use super::new::NewNotification;

/// Typed auxiliary data attached to a domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EventMetadata {
    /// Refers to a candidate, optionally within a job posting.
    Candidate {
        candidate_id: Uuid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        job_posting_id: Option<Uuid>,
    },
    /// Refers to a job posting.
    JobPosting { job_posting_id: Uuid },
    /// Progress of a bulk processing batch.
    ProcessingBatch {
        batch_id: Uuid,
        processed: u64,
        failed: u64,
    },
    /// A monitored metric crossed its threshold.
    MetricThreshold {
        metric: String,
        value: f64,
        threshold: f64,
    },
    /// A generated report.
    Report { report_id: Uuid, period: String },
    /// Free-form fields; stored as-is without a `kind` tag.
    Custom(serde_json::Map<String, serde_json::Value>),
}

impl EventMetadata {
    /// Flatten into the opaque JSON stored on the record.
    pub fn into_value(self) -> AppResult<serde_json::Value> {
        match self {
            Self::Custom(map) => Ok(serde_json::Value::Object(map)),
            other => Ok(serde_json::to_value(other)?),
        }
    }
}

/// One domain event addressed to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EventMetadata>,
}

impl NotificationEvent {
    /// Build an event without metadata.
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            kind,
            title: title.into(),
            content: content.into(),
            metadata: None,
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: EventMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// A candidate applied to a posting.
    pub fn new_application(
        user_id: UserId,
        candidate_name: &str,
        job_title: &str,
        candidate_id: Uuid,
        job_posting_id: Uuid,
    ) -> Self {
        Self::new(
            user_id,
            NotificationKind::NewApplication,
            "New Application",
            format!("{candidate_name} applied for {job_title}"),
        )
        .with_metadata(EventMetadata::Candidate {
            candidate_id,
            job_posting_id: Some(job_posting_id),
        })
    }

    /// An application moved between pipeline stages.
    pub fn status_change(
        user_id: UserId,
        candidate_name: &str,
        status: &str,
        candidate_id: Uuid,
    ) -> Self {
        Self::new(
            user_id,
            NotificationKind::StatusChange,
            "Application Status Updated",
            format!("{candidate_name} moved to {status}"),
        )
        .with_metadata(EventMetadata::Candidate {
            candidate_id,
            job_posting_id: None,
        })
    }

    /// AI evaluation finished with a score.
    pub fn ai_analysis_complete(
        user_id: UserId,
        candidate_name: &str,
        score: u8,
        candidate_id: Uuid,
    ) -> Self {
        Self::new(
            user_id,
            NotificationKind::AiAnalysisComplete,
            "AI Analysis Complete",
            format!("{candidate_name} scored {score}/100"),
        )
        .with_metadata(EventMetadata::Candidate {
            candidate_id,
            job_posting_id: None,
        })
    }

    /// The bias monitor flagged a posting.
    pub fn bias_alert(user_id: UserId, job_title: &str, job_posting_id: Uuid) -> Self {
        Self::new(
            user_id,
            NotificationKind::BiasAlert,
            "Bias Alert",
            format!("Potential bias detected in evaluations for {job_title}"),
        )
        .with_metadata(EventMetadata::JobPosting { job_posting_id })
    }

    /// A bulk batch finished.
    pub fn bulk_processing_complete(
        user_id: UserId,
        batch_id: Uuid,
        processed: u64,
        failed: u64,
    ) -> Self {
        Self::new(
            user_id,
            NotificationKind::BulkProcessingComplete,
            "Bulk Processing Complete",
            format!("{processed} resumes processed, {failed} failed"),
        )
        .with_metadata(EventMetadata::ProcessingBatch {
            batch_id,
            processed,
            failed,
        })
    }

    /// A monitored metric crossed its threshold.
    pub fn health_metrics_alert(user_id: UserId, metric: &str, value: f64, threshold: f64) -> Self {
        Self::new(
            user_id,
            NotificationKind::HealthMetricsAlert,
            "Health Metrics Alert",
            format!("{metric} is {value} (threshold {threshold})"),
        )
        .with_metadata(EventMetadata::MetricThreshold {
            metric: metric.to_string(),
            value,
            threshold,
        })
    }

    /// Convert into a store input, flattening the metadata.
    pub fn into_new(self) -> AppResult<NewNotification> {
        let metadata = self.metadata.map(EventMetadata::into_value).transpose()?;
        Ok(NewNotification {
            user_id: self.user_id,
            kind: self.kind,
            title: self.title,
            content: self.content,
            metadata,
        })
    }
}
