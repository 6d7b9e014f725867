// Event approval HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use eventline_core::{Decision, Event, EventDraft, RevisionRound, Role};

use crate::common::{ApiError, ListResponse};
use crate::services::ApprovalService;

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ApprovalService>,
}

impl AppState {
    pub fn new(service: Arc<ApprovalService>) -> Self {
        Self { service }
    }
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", post(submit_event))
        .route("/v1/events/pending", get(list_pending))
        .route("/v1/events/:event_id", get(get_event))
        .route("/v1/events/:event_id/decision", post(decide))
        .route(
            "/v1/events/:event_id/revision-response",
            post(respond_to_revision),
        )
        .route("/v1/events/:event_id/revisions", get(list_revisions))
        .with_state(state)
}

/// Request to submit a new event for approval
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitEventRequest {
    /// Community submitting the event
    pub community_id: Uuid,
    /// Submitting user (event creator)
    pub created_by: Uuid,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub capacity: Option<i32>,
    pub location: String,
}

/// Request for an approver decision on a pending event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DecisionRequest {
    /// Acting approver; role and college are resolved from the directory
    pub acting_user_id: Uuid,
    pub decision: Decision,
    /// Required for REJECT and REQUEST_REVISION, ignored for APPROVE
    #[serde(default)]
    pub reason: Option<String>,
}

/// Request answering an outstanding revision request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RevisionResponseRequest {
    /// Acting submitter (creator or community leader)
    pub acting_user_id: Uuid,
    pub response: String,
}

/// Query for the pending approval queue
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PendingQuery {
    pub role: Role,
    /// Required for college-scoped roles, ignored for the deanship
    pub college_id: Option<Uuid>,
}

/// POST /v1/events - Submit a new event into the approval chain
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = SubmitEventRequest,
    responses(
        (status = 201, description = "Event submitted, pending faculty approval", body = Event),
        (status = 400, description = "Malformed draft"),
        (status = 404, description = "Community or creator not found")
    ),
    tag = "events"
)]
pub async fn submit_event(
    State(state): State<AppState>,
    Json(req): Json<SubmitEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let draft = EventDraft {
        title: req.title,
        description: req.description,
        starts_at: req.starts_at,
        ends_at: req.ends_at,
        capacity: req.capacity,
        location: req.location,
    };

    let event = state
        .service
        .submit(req.community_id, req.created_by, draft)
        .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// POST /v1/events/{event_id}/decision - Approve, reject, or request revision
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/decision",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Transition applied", body = Event),
        (status = 400, description = "Missing reason text"),
        (status = 403, description = "Actor not eligible for this state"),
        (status = 404, description = "Event or user not found"),
        (status = 409, description = "Status changed since read; retry")
    ),
    tag = "events"
)]
pub async fn decide(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<Event>, ApiError> {
    let event = state
        .service
        .decide(event_id, req.acting_user_id, req.decision, req.reason)
        .await?;

    Ok(Json(event))
}

/// POST /v1/events/{event_id}/revision-response - Answer a revision request
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/revision-response",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = RevisionResponseRequest,
    responses(
        (status = 200, description = "Event returned to the requesting tier", body = Event),
        (status = 400, description = "Empty response text"),
        (status = 403, description = "Not the creator or community leader"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Status changed since read; retry")
    ),
    tag = "events"
)]
pub async fn respond_to_revision(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<RevisionResponseRequest>,
) -> Result<Json<Event>, ApiError> {
    let event = state
        .service
        .respond_to_revision(event_id, req.acting_user_id, req.response)
        .await?;

    Ok(Json(event))
}

/// GET /v1/events/pending - Pending queue for an approver role
#[utoipa::path(
    get,
    path = "/v1/events/pending",
    params(PendingQuery),
    responses(
        (status = 200, description = "Events awaiting this role", body = ListResponse<Event>),
        (status = 400, description = "Role has no pending queue")
    ),
    tag = "events"
)]
pub async fn list_pending(
    State(state): State<AppState>,
    Query(query): Query<PendingQuery>,
) -> Result<Json<ListResponse<Event>>, ApiError> {
    let events = state
        .service
        .list_pending_for_role(query.role, query.college_id)
        .await?;

    Ok(Json(ListResponse::new(events)))
}

/// GET /v1/events/{event_id} - Fetch an event (terminal events stay queryable)
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let event = state
        .service
        .get(event_id)
        .await?
        .ok_or_else(|| eventline_core::ApprovalError::event_not_found(event_id))?;

    Ok(Json(event))
}

/// GET /v1/events/{event_id}/revisions - Append-only revision history
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/revisions",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Revision rounds, oldest first", body = ListResponse<RevisionRound>),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn list_revisions(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<ListResponse<RevisionRound>>, ApiError> {
    let rounds = state.service.list_revision_rounds(event_id).await?;

    Ok(Json(ListResponse::new(rounds)))
}
