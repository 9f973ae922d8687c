//! # hirepulse-database
//!
//! Persistence for notification records: the [`NotificationStore`]
//! contract, its PostgreSQL implementation, and a process-local
//! implementation used by tests and the `memory` provider.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryNotificationStore;
pub use repositories::NotificationRepository;
pub use store::NotificationStore;
