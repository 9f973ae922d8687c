//! Reconnecting WebSocket transport.
//!
//! [`LiveTransport::spawn`] starts a background task that connects to
//! `/ws?token=…`, forwards server frames as [`TransportSignal`]s, answers
//! heartbeats, and reconnects with exponential backoff until cancelled or
//! the credential is rejected.

pub mod backoff;
pub mod connection;
pub mod state;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use hirepulse_core::error::AppError;
use hirepulse_core::result::AppResult;
use hirepulse_entity::{ClientMessage, ServerMessage};

pub use backoff::ReconnectPolicy;
pub use state::{ConnectionState, TransportEvent};

/// What the transport reports to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportSignal {
    /// A (re)connection completed; history should be re-fetched.
    Connected,
    /// The socket dropped; a retry is scheduled.
    Disconnected,
    /// The credential was rejected; no retry follows.
    Failed,
    /// A server frame other than `ping`.
    Message(ServerMessage),
}

/// Outbound side of the transport as seen by the store.
pub trait CommandSink: Send + Sync + 'static {
    /// Send a frame on the current connection.
    fn send(&self, message: ClientMessage) -> AppResult<()>;
}

/// Cloneable handle to a running transport.
#[derive(Debug, Clone)]
pub struct TransportHandle {
    state: watch::Receiver<ConnectionState>,
    outbound: mpsc::Sender<ClientMessage>,
}

impl TransportHandle {
    /// Current state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Whether frames can be sent right now.
    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Watch state changes.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }
}

impl CommandSink for TransportHandle {
    fn send(&self, message: ClientMessage) -> AppResult<()> {
        if !self.is_connected() {
            return Err(AppError::transport(format!(
                "Cannot send '{}' while {}",
                message.event_name(),
                self.state()
            )));
        }
        self.outbound
            .try_send(message)
            .map_err(|_| AppError::transport("Outbound queue unavailable"))
    }
}

/// Entry point for starting a transport.
#[derive(Debug)]
pub struct LiveTransport;

impl LiveTransport {
    /// Start the connection loop.
    ///
    /// Returns the handle, the signal stream, and the task driving the
    /// connection. Cancelling `cancel` stops the loop, including any
    /// pending retry.
    pub fn spawn(
        ws_url: &str,
        token: &str,
        policy: ReconnectPolicy,
        cancel: CancellationToken,
    ) -> AppResult<(TransportHandle, mpsc::Receiver<TransportSignal>, JoinHandle<()>)> {
        let url = connection::connect_url(ws_url, token)?;
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (outbound_tx, outbound_rx) = mpsc::channel(64);
        let (signal_tx, signal_rx) = mpsc::channel(256);

        let task = tokio::spawn(connection::run(
            url,
            policy,
            state_tx,
            outbound_rx,
            signal_tx,
            cancel,
        ));

        Ok((
            TransportHandle {
                state: state_rx,
                outbound: outbound_tx,
            },
            signal_rx,
            task,
        ))
    }
}
