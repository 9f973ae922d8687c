//! WebSocket upgrade handler.

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use hirepulse_realtime::connection::authenticator::AuthenticatedConnection;
use hirepulse_realtime::connection::heartbeat::run_heartbeat;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    #[serde(default)]
    pub token: String,
}

/// GET /ws?token={jwt} — WebSocket upgrade
///
/// The credential is checked before the upgrade so a rejected client sees
/// a plain 401 instead of a socket that closes immediately.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, ApiError> {
    let auth_info = state.realtime.authenticator.authenticate(&query.token)?;

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let max_bytes = state.config.realtime.max_message_bytes;
    Ok(ws
        .max_message_size(max_bytes.saturating_mul(4))
        .on_upgrade(move |socket| handle_ws_connection(state, auth_info, socket)))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, auth: AuthenticatedConnection, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let connections = state.realtime.connections.clone();
    let (handle, mut outbound_rx) = connections.register(&auth);
    let conn_id = handle.id;

    info!(
        conn_id = %conn_id,
        user_id = %auth.user_id,
        "WebSocket connection established"
    );

    let heartbeat_task = tokio::spawn(run_heartbeat(
        handle.clone(),
        state.realtime.heartbeat_config(),
        state.realtime.metrics.clone(),
    ));

    // Outbound forwarder; sends a close frame once the server drops the connection.
    let outbound_handle = handle.clone();
    let outbound_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                maybe = outbound_rx.recv() => {
                    let Some(frame) = maybe else { break };
                    if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                _ = outbound_handle.closed() => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    loop {
        let next = tokio::select! {
            next = ws_rx.next() => next,
            _ = handle.closed() => break,
        };
        match next {
            Some(Ok(Message::Text(text))) => {
                connections.handle_inbound(&conn_id, text.as_str()).await;
            }
            Some(Ok(Message::Close(_))) | None => break,
            // Protocol-level pings are answered by axum.
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    connections.unregister(&conn_id);
    heartbeat_task.abort();
    let _ = outbound_task.await;

    info!(
        conn_id = %conn_id,
        user_id = %auth.user_id,
        "WebSocket connection closed"
    );
}
