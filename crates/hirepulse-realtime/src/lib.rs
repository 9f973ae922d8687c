//! # hirepulse-realtime
//!
//! Real-time WebSocket engine for the HirePulse notification pipeline.
//! Provides:
//!
//! - WebSocket connection management with JWT authentication
//! - Per-user fan-out to every connection of the owner
//! - Ping/pong heartbeat with timeout eviction
//! - The event bridge turning domain events into persisted, pushed records
//! - Engine metrics

pub mod bridge;
pub mod connection;
pub mod message;
pub mod metrics;
pub mod notification;
pub mod server;

pub use bridge::{EventBridge, EventEmitter};
pub use connection::manager::ConnectionManager;
pub use notification::dispatcher::NotificationDispatcher;
pub use server::RealtimeEngine;
