//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, mpsc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use hirepulse_core::types::{ConnectionId, SessionId, UserId};

/// A handle to a single WebSocket connection.
///
/// Holds the sender channel for pushing encoded frames to the client,
/// plus metadata about the connected user and session.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// User who owns this connection
    pub user_id: UserId,
    /// Session this connection belongs to
    pub session_id: SessionId,
    /// Username (cached for logs)
    pub username: String,
    /// Sender for outbound JSON frames
    sender: mpsc::Sender<String>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Last pong received
    pub last_pong: RwLock<Instant>,
    /// Whether the connection is still alive
    alive: AtomicBool,
    /// Cancelled when the server closes this connection
    closed: CancellationToken,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(
        user_id: UserId,
        session_id: SessionId,
        username: String,
        sender: mpsc::Sender<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ConnectionId::new(),
            user_id,
            session_id,
            username,
            sender,
            connected_at: now,
            last_pong: RwLock::new(Instant::now()),
            alive: AtomicBool::new(true),
            closed: CancellationToken::new(),
        }
    }

    /// Queue an encoded frame for this connection.
    ///
    /// Never blocks: a full buffer drops the frame, a closed receiver marks
    /// the connection dead.
    pub fn send(&self, frame: String) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(_) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Connection send buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as dead without closing the socket
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Mark dead and ask the socket task to close.
    pub fn close(&self) {
        self.mark_dead();
        self.closed.cancel();
    }

    /// Resolves once [`close`](Self::close) has been called.
    pub async fn closed(&self) {
        self.closed.cancelled().await;
    }

    /// Record a pong response
    pub async fn record_pong(&self) {
        let mut lp = self.last_pong.write().await;
        *lp = Instant::now();
    }

    /// Get a snapshot of connection info
    pub fn info(&self) -> ConnectionInfo {
        ConnectionInfo {
            id: self.id,
            user_id: self.user_id,
            session_id: self.session_id,
            username: self.username.clone(),
            connected_at: self.connected_at,
            alive: self.is_alive(),
        }
    }
}

/// Snapshot of connection info (serializable)
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionInfo {
    pub id: ConnectionId,
    pub user_id: UserId,
    pub session_id: SessionId,
    pub username: String,
    pub connected_at: DateTime<Utc>,
    pub alive: bool,
}
