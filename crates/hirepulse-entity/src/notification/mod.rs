//! Notification domain entities.

pub mod event;
pub mod filter;
pub mod kind;
pub mod model;
pub mod new;

pub use event::{EventMetadata, NotificationEvent};
pub use filter::NotificationFilter;
pub use kind::NotificationKind;
pub use model::{Notification, display_order, sort_for_display};
pub use new::NewNotification;
