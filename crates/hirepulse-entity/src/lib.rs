//! # hirepulse-entity
//!
//! Domain models for the HirePulse notification pipeline. Every struct in
//! this crate is either a persisted record, a producer input, or a frame on
//! the live transport. All of them derive `Debug`, `Clone`, `Serialize` and
//! `Deserialize`; persistence mapping lives in `hirepulse-database`.

pub mod notification;
pub mod protocol;

pub use notification::{
    EventMetadata, NewNotification, Notification, NotificationEvent, NotificationFilter,
    NotificationKind,
};
pub use protocol::{ClientMessage, ServerMessage};
