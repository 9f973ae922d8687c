//! PostgreSQL repository implementations.

pub mod notification;

pub use notification::NotificationRepository;
