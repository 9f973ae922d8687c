//! # hirepulse-client
//!
//! Client side of the HirePulse notification pipeline:
//!
//! - [`api`]: REST access to the notification endpoints
//! - [`transport`]: reconnecting WebSocket with an explicit state machine
//! - [`store`]: the reconciled notification list and its derived views
//! - [`alert`]: sound/alert side effects for new notifications
//! - [`session`]: wires the pieces together for one logged-in user

pub mod alert;
pub mod api;
pub mod session;
pub mod store;
pub mod transport;

pub use alert::{AlertAdapter, AlertSink, AlertTone, TracingAlertSink};
pub use api::{HttpNotificationApi, NotificationApi};
pub use session::NotificationSession;
pub use store::ClientNotificationStore;
pub use transport::{CommandSink, ConnectionState, LiveTransport, TransportHandle, TransportSignal};
