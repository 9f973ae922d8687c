//! Client-side configuration for the notification session.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Settings used by `hirepulse-client` to reach the notification server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST API, e.g. `http://localhost:8080/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// WebSocket endpoint, e.g. `ws://localhost:8080/ws`.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// First reconnect delay in milliseconds.
    #[serde(default = "default_reconnect_base")]
    pub reconnect_base_ms: u64,
    /// Upper bound for the reconnect delay in milliseconds.
    #[serde(default = "default_reconnect_max")]
    pub reconnect_max_ms: u64,
    /// REST request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Whether new notifications trigger an alert.
    #[serde(default = "default_true")]
    pub alerts_enabled: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ws_url: default_ws_url(),
            reconnect_base_ms: default_reconnect_base(),
            reconnect_max_ms: default_reconnect_max(),
            request_timeout_seconds: default_request_timeout(),
            alerts_enabled: default_true(),
        }
    }
}

impl ClientConfig {
    /// Load client settings from `config/client.toml` and `HIREPULSE_CLIENT__*` variables.
    pub fn load() -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/client").required(false))
            .add_source(
                config::Environment::with_prefix("HIREPULSE_CLIENT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_ws_url() -> String {
    "ws://localhost:8080/ws".to_string()
}

fn default_reconnect_base() -> u64 {
    1_000
}

fn default_reconnect_max() -> u64 {
    30_000
}

fn default_request_timeout() -> u64 {
    15
}

fn default_true() -> bool {
    true
}
