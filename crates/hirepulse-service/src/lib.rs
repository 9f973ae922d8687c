//! # hirepulse-service
//!
//! Business logic service layer for the notification pipeline. Services
//! follow constructor injection: the store is provided at construction
//! time as an `Arc<dyn NotificationStore>`.

pub mod context;
pub mod notification;

pub use context::RequestContext;
pub use notification::{NotificationService, RetentionTask};
