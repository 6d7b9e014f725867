// Eventline API server
// Campus event approval chain: submission → faculty → dean → deanship

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use eventline_api::{common, events, notifications, services};
use eventline_core::{
    Decision, Event, EventStatus, Notification, NotificationKind, NotificationPayload,
    RevisionRound, Role, Tier,
};
use eventline_storage::{Database, DbDirectory, DbEventStore, DbNotificationStore};
use services::{ApprovalService, NotificationService};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        events::submit_event,
        events::decide,
        events::respond_to_revision,
        events::list_pending,
        events::get_event,
        events::list_revisions,
        notifications::list_notifications,
        notifications::unread_count,
        notifications::mark_read,
        notifications::mark_all_read,
    ),
    components(
        schemas(
            Event, EventStatus, Tier, Role, Decision,
            Notification, NotificationKind, NotificationPayload,
            RevisionRound,
            events::SubmitEventRequest,
            events::DecisionRequest,
            events::RevisionResponseRequest,
            notifications::RecipientRequest,
            notifications::UnreadCountResponse,
            common::ListResponse<Event>,
            common::ListResponse<Notification>,
            common::ListResponse<RevisionRound>,
            common::ErrorResponse,
        )
    ),
    tags(
        (name = "events", description = "Event submission and approval endpoints"),
        (name = "notifications", description = "In-app notification endpoints")
    ),
    info(
        title = "Eventline API",
        version = "0.3.0",
        description = "API for the campus event approval chain and its notifications",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventline_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("eventline-api starting...");

    // Initialize database
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
    let db = Database::from_url(&database_url)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Connected to database");

    // Wire backends into the services
    let event_store = Arc::new(DbEventStore::new(db.clone()));
    let notification_store = Arc::new(DbNotificationStore::new(db.clone()));
    let directory = Arc::new(DbDirectory::new(db));

    let approval = Arc::new(ApprovalService::new(
        event_store,
        notification_store.clone(),
        directory,
    ));
    let notification = Arc::new(NotificationService::new(notification_store));

    let events_state = events::AppState::new(approval);
    let notifications_state = notifications::AppState::new(notification);

    // Load API prefix from environment (default: empty)
    // Example: API_PREFIX="/api" results in routes like /api/v1/events
    let api_prefix = std::env::var("API_PREFIX").unwrap_or_default();
    if !api_prefix.is_empty() {
        tracing::info!(prefix = %api_prefix, "API prefix configured");
    }

    // Load CORS allowed origins from environment (optional)
    // Only needed when UI is served from a different origin than the API
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect()
        })
        .unwrap_or_default();

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    // Build API routes
    let api_routes = Router::new()
        .merge(events::routes(events_state))
        .merge(notifications::routes(notifications_state));

    // Build main router with health (not prefixed) and prefixed API routes
    let mut app = Router::new().route("/health", get(health));
    app = app.merge(build_router_with_prefix(api_routes, &api_prefix));

    // Add Swagger UI
    let app =
        app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        )
    } else {
        app
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:9000".into());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Nest the API routes under API_PREFIX when one is configured
fn build_router_with_prefix(api_routes: Router, api_prefix: &str) -> Router {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn sample_routes() -> Router {
        Router::new().route("/v1/events/pending", get(|| async { "pending" }))
    }

    #[tokio::test]
    async fn no_prefix_serves_routes_at_root() {
        let app = build_router_with_prefix(sample_routes(), "");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/events/pending")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"pending");
    }

    #[tokio::test]
    async fn prefix_moves_routes_off_root() {
        let app = build_router_with_prefix(sample_routes(), "/api");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/events/pending")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);

        // Unprefixed path must no longer resolve
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/events/pending")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
    }
}
