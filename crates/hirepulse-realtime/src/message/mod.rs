//! WebSocket frame encoding and inbound validation.

pub mod serializer;
pub mod validator;

pub use hirepulse_entity::{ClientMessage, ServerMessage};
