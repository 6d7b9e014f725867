// Notification HTTP routes
//
// Read-marking and count queries only; push delivery is a transport
// concern that lives outside this service.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use eventline_core::Notification;

use crate::common::{ApiError, ListResponse};
use crate::services::NotificationService;

/// App state for notification routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<NotificationService>,
}

impl AppState {
    pub fn new(service: Arc<NotificationService>) -> Self {
        Self { service }
    }
}

/// Create notification routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/notifications", get(list_notifications))
        .route("/v1/notifications/unread-count", get(unread_count))
        .route("/v1/notifications/:notification_id/read", post(mark_read))
        .route("/v1/notifications/read-all", post(mark_all_read))
        .with_state(state)
}

/// Recipient selector for notification queries
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct RecipientQuery {
    pub user_id: Uuid,
}

/// Body identifying the acting recipient
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipientRequest {
    pub user_id: Uuid,
}

/// Unread notification count
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountResponse {
    pub count: u64,
}

/// GET /v1/notifications - All notifications for a recipient, newest first
#[utoipa::path(
    get,
    path = "/v1/notifications",
    params(RecipientQuery),
    responses(
        (status = 200, description = "Notifications for the recipient", body = ListResponse<Notification>)
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<RecipientQuery>,
) -> Result<Json<ListResponse<Notification>>, ApiError> {
    let notifications = state.service.list_for_user(query.user_id).await?;

    Ok(Json(ListResponse::new(notifications)))
}

/// GET /v1/notifications/unread-count - Unread count for a recipient
#[utoipa::path(
    get,
    path = "/v1/notifications/unread-count",
    params(RecipientQuery),
    responses(
        (status = 200, description = "Unread count", body = UnreadCountResponse)
    ),
    tag = "notifications"
)]
pub async fn unread_count(
    State(state): State<AppState>,
    Query(query): Query<RecipientQuery>,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let count = state.service.unread_count(query.user_id).await?;

    Ok(Json(UnreadCountResponse { count }))
}

/// POST /v1/notifications/{notification_id}/read - Mark one notification read
#[utoipa::path(
    post,
    path = "/v1/notifications/{notification_id}/read",
    params(
        ("notification_id" = Uuid, Path, description = "Notification ID")
    ),
    request_body = RecipientRequest,
    responses(
        (status = 204, description = "Marked read"),
        (status = 404, description = "Not found or owned by someone else")
    ),
    tag = "notifications"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
    Json(req): Json<RecipientRequest>,
) -> Result<StatusCode, ApiError> {
    state.service.mark_read(notification_id, req.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/notifications/read-all - Mark everything read for a recipient
#[utoipa::path(
    post,
    path = "/v1/notifications/read-all",
    request_body = RecipientRequest,
    responses(
        (status = 200, description = "Number of notifications flipped", body = UnreadCountResponse)
    ),
    tag = "notifications"
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Json(req): Json<RecipientRequest>,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let count = state.service.mark_all_read(req.user_id).await?;

    Ok(Json(UnreadCountResponse { count }))
}
