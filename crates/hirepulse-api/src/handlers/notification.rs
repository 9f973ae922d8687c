//! Notification handlers.

use axum::Json;
use axum::extract::{Query, State};

use hirepulse_core::types::{ApiResponse, PageResponse};
use hirepulse_entity::Notification;

use crate::dto::request::ListNotificationsQuery;
use crate::dto::response::{CountResponse, MarkAllReadResponse, NotificationAck};
use crate::error::ApiError;
use crate::extractors::{AuthUser, NotificationPath};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListNotificationsQuery>,
) -> Result<Json<ApiResponse<PageResponse<Notification>>>, ApiError> {
    let filter = params.filter()?;
    let page = state
        .notification_service
        .list_notifications(&auth, &filter, params.page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notification_service.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PATCH /api/notifications/{id}/read
///
/// Not fanned out; the calling client mirrors it over its live connection.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    NotificationPath(id): NotificationPath,
) -> Result<Json<ApiResponse<NotificationAck>>, ApiError> {
    state.notification_service.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(NotificationAck { id })))
}

/// PATCH /api/notifications/mark-all-read
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MarkAllReadResponse>>, ApiError> {
    let updated = state.notification_service.mark_all_read(&auth).await?;
    state.realtime.notifications.push_all_read(auth.user_id);
    Ok(Json(ApiResponse::ok(MarkAllReadResponse { updated })))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    NotificationPath(id): NotificationPath,
) -> Result<Json<ApiResponse<NotificationAck>>, ApiError> {
    state.notification_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(NotificationAck { id })))
}
