//! JSON serialization for WebSocket frames.

use hirepulse_core::result::AppResult;
use hirepulse_entity::{ClientMessage, ServerMessage};

/// Serialize an outbound frame.
pub fn encode(msg: &ServerMessage) -> AppResult<String> {
    msg.to_json()
}

/// Deserialize an inbound frame.
pub fn decode(text: &str) -> AppResult<ClientMessage> {
    ClientMessage::from_json(text)
}
