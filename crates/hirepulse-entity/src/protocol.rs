//! Live transport frames.
//!
//! Every frame is a JSON text message of the shape
//! `{ "event": NAME, "data": PAYLOAD }`.

use serde::{Deserialize, Serialize};

use hirepulse_core::AppResult;
use hirepulse_core::types::{NotificationId, UserId};

use crate::notification::Notification;

/// Frames pushed from the server to a connected client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerMessage {
    /// A record was created for the connected user.
    #[serde(rename = "notification:new")]
    NotificationNew(Notification),
    /// A record was marked read in another session.
    #[serde(rename = "notification:read")]
    NotificationRead { id: NotificationId },
    /// A record was deleted in another session.
    #[serde(rename = "notification:deleted")]
    NotificationDeleted { id: NotificationId },
    /// Every record of the user was marked read.
    #[serde(rename = "notification:all-read")]
    NotificationAllRead {
        #[serde(rename = "userId")]
        user_id: UserId,
    },
    /// Heartbeat; the client answers with [`ClientMessage::Pong`].
    #[serde(rename = "ping")]
    Ping { timestamp: i64 },
    /// The server rejected an inbound frame.
    #[serde(rename = "error")]
    Error { code: String, message: String },
}

impl ServerMessage {
    /// Event name as it appears on the wire.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::NotificationNew(_) => "notification:new",
            Self::NotificationRead { .. } => "notification:read",
            Self::NotificationDeleted { .. } => "notification:deleted",
            Self::NotificationAllRead { .. } => "notification:all-read",
            Self::Ping { .. } => "ping",
            Self::Error { .. } => "error",
        }
    }

    /// Build an error frame.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Encode as a JSON text frame.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON text frame.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Frames sent from a client to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientMessage {
    /// Mirror of a successful REST mark-read.
    #[serde(rename = "markAsRead")]
    MarkAsRead { id: NotificationId },
    /// Mirror of a successful REST delete.
    #[serde(rename = "deleteNotification")]
    DeleteNotification { id: NotificationId },
    /// Heartbeat reply.
    #[serde(rename = "pong")]
    Pong { timestamp: i64 },
}

impl ClientMessage {
    /// Event name as it appears on the wire.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::MarkAsRead { .. } => "markAsRead",
            Self::DeleteNotification { .. } => "deleteNotification",
            Self::Pong { .. } => "pong",
        }
    }

    /// Encode as a JSON text frame.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON text frame.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
