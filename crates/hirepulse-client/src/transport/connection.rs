//! The connection loop behind [`LiveTransport`](super::LiveTransport).

use futures::{Sink, SinkExt, StreamExt};
use reqwest::Url;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use hirepulse_core::error::AppError;
use hirepulse_core::result::AppResult;
use hirepulse_entity::{ClientMessage, ServerMessage};

use super::backoff::ReconnectPolicy;
use super::state::{ConnectionState, TransportEvent};
use super::TransportSignal;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Append the credential to the transport url.
pub fn connect_url(ws_url: &str, token: &str) -> AppResult<Url> {
    let mut url = Url::parse(ws_url.trim())
        .map_err(|e| AppError::configuration(format!("Invalid transport url '{ws_url}': {e}")))?;
    url.query_pairs_mut().append_pair("token", token);
    Ok(url)
}

/// How a connection attempt or session ended.
enum Outcome {
    /// Retry after backoff.
    Retry,
    /// Credential rejected.
    Rejected,
    /// Owner cancelled.
    Cancelled,
}

struct Machine {
    state: watch::Sender<ConnectionState>,
    signals: mpsc::Sender<TransportSignal>,
}

impl Machine {
    fn apply(&self, event: TransportEvent) {
        let current = *self.state.borrow();
        match current.next(event) {
            Some(next) if next != current => {
                debug!(from = %current, to = %next, ?event, "Transport state change");
                self.state.send_replace(next);
            }
            Some(_) => {}
            None => debug!(state = %current, ?event, "Ignored transport event"),
        }
    }

    async fn signal(&self, signal: TransportSignal) {
        let _ = self.signals.send(signal).await;
    }
}

pub(super) async fn run(
    url: Url,
    policy: ReconnectPolicy,
    state: watch::Sender<ConnectionState>,
    mut outbound: mpsc::Receiver<ClientMessage>,
    signals: mpsc::Sender<TransportSignal>,
    cancel: CancellationToken,
) {
    let machine = Machine { state, signals };
    let mut attempt: u32 = 0;

    loop {
        machine.apply(TransportEvent::Connect);

        let connected = tokio::select! {
            result = connect_async(url.as_str()) => result,
            _ = cancel.cancelled() => break,
        };

        let outcome = match connected {
            Ok((socket, _response)) => {
                attempt = 0;
                machine.apply(TransportEvent::Opened);
                info!("Live transport connected");
                machine.signal(TransportSignal::Connected).await;

                let outcome = session(socket, &mut outbound, &machine, &cancel).await;
                if matches!(outcome, Outcome::Retry) {
                    machine.apply(TransportEvent::Dropped);
                    machine.signal(TransportSignal::Disconnected).await;
                }
                outcome
            }
            Err(tungstenite::Error::Http(response))
                if matches!(response.status().as_u16(), 401 | 403) =>
            {
                Outcome::Rejected
            }
            Err(e) => {
                warn!(error = %e, attempt, "Live transport connect failed");
                machine.apply(TransportEvent::Dropped);
                Outcome::Retry
            }
        };

        match outcome {
            Outcome::Cancelled => break,
            Outcome::Rejected => {
                warn!("Live transport credential rejected; not retrying");
                machine.apply(TransportEvent::AuthRejected);
                machine.signal(TransportSignal::Failed).await;
                return;
            }
            Outcome::Retry => {}
        }

        let delay = policy.delay_for(attempt);
        attempt = attempt.saturating_add(1);
        debug!(delay_ms = delay.as_millis() as u64, attempt, "Reconnect scheduled");
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = cancel.cancelled() => break,
        }
    }

    machine.apply(TransportEvent::Shutdown);
    info!("Live transport stopped");
}

async fn session(
    socket: Socket,
    outbound: &mut mpsc::Receiver<ClientMessage>,
    machine: &Machine,
    cancel: &CancellationToken,
) -> Outcome {
    let (mut writer, mut reader) = socket.split();

    loop {
        tokio::select! {
            frame = reader.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match ServerMessage::from_json(text.as_str()) {
                        Ok(ServerMessage::Ping { timestamp }) => {
                            let pong = ClientMessage::Pong { timestamp };
                            if !write(&mut writer, &pong).await {
                                return Outcome::Retry;
                            }
                        }
                        Ok(ServerMessage::Error { code, message }) => {
                            warn!(%code, %message, "Server rejected a frame");
                        }
                        Ok(msg) => machine.signal(TransportSignal::Message(msg)).await,
                        Err(e) => warn!(error = %e, "Unreadable server frame"),
                    }
                }
                Some(Ok(Message::Close(_))) | None => return Outcome::Retry,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "Live transport read failed");
                    return Outcome::Retry;
                }
            },
            command = outbound.recv() => {
                // The handle owning the sender is gone.
                let Some(command) = command else { return Outcome::Cancelled };
                if !write(&mut writer, &command).await {
                    return Outcome::Retry;
                }
            }
            _ = cancel.cancelled() => {
                let _ = writer.send(Message::Close(None)).await;
                return Outcome::Cancelled;
            }
        }
    }
}

async fn write<S>(writer: &mut S, message: &ClientMessage) -> bool
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let frame = match message.to_json() {
        Ok(frame) => frame,
        Err(e) => {
            warn!(error = %e, "Failed to encode client frame");
            return true;
        }
    };
    match writer.send(Message::Text(frame.into())).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, event = message.event_name(), "Live transport write failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_url_encoded() {
        let url = connect_url("ws://localhost:8080/ws", "a.b+c").expect("url");
        assert_eq!(url.as_str(), "ws://localhost:8080/ws?token=a.b%2Bc");
    }

    #[test]
    fn rejects_garbage_url() {
        assert!(connect_url("::", "t").is_err());
    }
}
