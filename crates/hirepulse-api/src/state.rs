//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use hirepulse_auth::jwt::JwtDecoder;
use hirepulse_core::config::AppConfig;
use hirepulse_realtime::RealtimeEngine;
use hirepulse_service::NotificationService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Notification service
    pub notification_service: Arc<NotificationService>,
    /// WebSocket realtime engine
    pub realtime: Arc<RealtimeEngine>,
    /// Process start, reported by the health endpoint
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Assemble the state, wiring the realtime engine to the same service
    /// and decoder the REST handlers use.
    pub fn new(config: AppConfig, notification_service: Arc<NotificationService>) -> Self {
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let realtime = Arc::new(RealtimeEngine::new(
            config.realtime.clone(),
            notification_service.clone(),
            jwt_decoder.clone(),
        ));
        Self {
            config: Arc::new(config),
            jwt_decoder,
            notification_service,
            realtime,
            started_at: Utc::now(),
        }
    }
}
