//! Notification fan-out to connected sessions.

pub mod dispatcher;

pub use dispatcher::NotificationDispatcher;
