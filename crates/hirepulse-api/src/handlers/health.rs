//! Health check handlers.

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use hirepulse_core::types::ApiResponse;

use crate::dto::response::{DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let store = state.notification_service.store();
    let store_ok = match store.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            false
        }
    };

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: if store_ok { "ok" } else { "degraded" }.to_string(),
        store_backend: store.backend().to_string(),
        store: if store_ok { "connected" } else { "unavailable" }.to_string(),
        ws_connections: state.realtime.connections.connection_count(),
        online_users: state.realtime.connections.user_count(),
        realtime: state.realtime.metrics.snapshot(),
        checked_at: Utc::now(),
    }))
}
