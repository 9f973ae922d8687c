//! Bridges between domain events and the real-time notification system.

pub mod emitter;
pub mod event_bridge;

pub use emitter::{EventEmitter, spawn_event_consumer};
pub use event_bridge::EventBridge;
