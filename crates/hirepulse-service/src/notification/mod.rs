//! Notification queries, mutations, and retention.

pub mod retention;
pub mod service;

pub use retention::{RetentionReport, RetentionTask};
pub use service::NotificationService;
