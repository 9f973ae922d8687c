//! Connection state machine of the live transport.

use serde::{Deserialize, Serialize};

/// Observable connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Not connected; a retry may be pending.
    Disconnected,
    /// Handshake in progress.
    Connecting,
    /// Socket open, frames flowing.
    Connected,
    /// Credential rejected. Terminal.
    Failed,
}

/// Inputs that drive [`ConnectionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// A connection attempt starts.
    Connect,
    /// The handshake succeeded.
    Opened,
    /// The socket failed or closed.
    Dropped,
    /// The server answered 401/403.
    AuthRejected,
    /// The owner tore the transport down.
    Shutdown,
}

impl ConnectionState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Failed => "failed",
        }
    }

    /// Transition table. `None` means the event is not valid in this state.
    #[must_use]
    pub fn next(self, event: TransportEvent) -> Option<Self> {
        use ConnectionState::*;
        use TransportEvent::*;

        match (self, event) {
            (Failed, _) => None,
            (_, Shutdown) => Some(Disconnected),
            (Disconnected, Connect) => Some(Connecting),
            (Connecting, Opened) => Some(Connected),
            (Connecting, Dropped) => Some(Disconnected),
            (Connecting, AuthRejected) => Some(Failed),
            (Connected, Dropped) => Some(Disconnected),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Failed
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
