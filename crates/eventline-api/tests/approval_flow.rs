// End-to-end approval chain tests over the real routers with in-memory
// backends. Covers the full faculty → dean → deanship walk, revision
// round-trips, tier authorization, and terminal states.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use eventline_api::services::{ApprovalService, NotificationService};
use eventline_api::{events, notifications};
use eventline_core::memory::{
    InMemoryDirectory, InMemoryEventStore, InMemoryNotificationStore,
};
use eventline_core::{NotificationStore, Role};

struct TestApp {
    router: Router,
    notifications: InMemoryNotificationStore,
    college_id: Uuid,
    community_id: Uuid,
    student: Uuid,
    faculty_leader: Uuid,
    dean: Uuid,
    deanship: Uuid,
}

async fn test_app() -> TestApp {
    let events_store = InMemoryEventStore::new();
    let notifications_store = InMemoryNotificationStore::new();
    let directory = InMemoryDirectory::new();

    let college_id = Uuid::now_v7();
    let community_id = Uuid::now_v7();
    let student = Uuid::now_v7();
    let faculty_leader = Uuid::now_v7();
    let dean = Uuid::now_v7();
    let deanship = Uuid::now_v7();

    directory
        .add_user(student, "Sara", Role::Student, Some(college_id))
        .await;
    directory
        .add_user(faculty_leader, "Dr. Faris", Role::FacultyLeader, Some(college_id))
        .await;
    directory
        .add_user(dean, "Dr. Dana", Role::DeanOfFaculty, Some(college_id))
        .await;
    directory
        .add_user(deanship, "Student Affairs", Role::Deanship, None)
        .await;
    directory
        .add_community(community_id, college_id, student)
        .await;

    let approval = Arc::new(ApprovalService::new(
        Arc::new(events_store),
        Arc::new(notifications_store.clone()),
        Arc::new(directory),
    ));
    let notification_service = Arc::new(NotificationService::new(Arc::new(
        notifications_store.clone(),
    )));

    let router = Router::new()
        .merge(events::routes(events::AppState::new(approval)))
        .merge(notifications::routes(notifications::AppState::new(
            notification_service,
        )));

    TestApp {
        router,
        notifications: notifications_store,
        college_id,
        community_id,
        student,
        faculty_leader,
        dean,
        deanship,
    }
}

async fn request(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn draft(app: &TestApp, title: &str) -> Value {
    json!({
        "community_id": app.community_id,
        "created_by": app.student,
        "title": title,
        "description": "Annual showcase with demos",
        "starts_at": Utc::now() + Duration::days(14),
        "location": "Main Auditorium",
        "capacity": 150
    })
}

async fn submit(app: &TestApp, title: &str) -> Value {
    let (status, body) = request(&app.router, "POST", "/v1/events", Some(draft(app, title))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn decide(
    app: &TestApp,
    event_id: &str,
    user: Uuid,
    decision: &str,
    reason: Option<&str>,
) -> (StatusCode, Value) {
    request(
        &app.router,
        "POST",
        &format!("/v1/events/{event_id}/decision"),
        Some(json!({
            "acting_user_id": user,
            "decision": decision,
            "reason": reason,
        })),
    )
    .await
}

#[tokio::test]
async fn submit_creates_pending_faculty_event_and_notifies_leader() {
    let app = test_app().await;
    let event = submit(&app, "Tech Day").await;

    assert_eq!(event["status"], "PENDING_FACULTY_APPROVAL");
    assert_eq!(event["college_id"], json!(app.college_id));

    let inbox = app.notifications.list_for_user(app.faculty_leader).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind.as_str(), "EVENT_SUBMITTED");
    assert!(inbox[0].message.contains("Tech Day"));
}

#[tokio::test]
async fn malformed_draft_is_rejected_before_any_write() {
    let app = test_app().await;
    let mut body = draft(&app, "");
    body["title"] = json!("   ");

    let (status, _) = request(&app.router, "POST", "/v1/events", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, pending) = request(
        &app.router,
        "GET",
        &format!("/v1/events/pending?role=FACULTY_LEADER&college_id={}", app.college_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn dean_cannot_act_while_pending_faculty() {
    let app = test_app().await;
    let event = submit(&app, "Career Fair").await;
    let id = event["id"].as_str().unwrap();

    let (status, _) = decide(&app, id, app.dean, "APPROVE", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, fetched) = request(&app.router, "GET", &format!("/v1/events/{id}"), None).await;
    assert_eq!(fetched["status"], "PENDING_FACULTY_APPROVAL");
}

#[tokio::test]
async fn reject_without_reason_is_bad_request() {
    let app = test_app().await;
    let event = submit(&app, "Movie Night").await;
    let id = event["id"].as_str().unwrap();

    let (status, _) = decide(&app, id, app.faculty_leader, "REJECT", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, fetched) = request(&app.router, "GET", &format!("/v1/events/{id}"), None).await;
    assert_eq!(fetched["status"], "PENDING_FACULTY_APPROVAL");
}

#[tokio::test]
async fn faculty_revision_round_trip_preserves_both_texts() {
    let app = test_app().await;
    let event = submit(&app, "Robotics Expo").await;
    let id = event["id"].as_str().unwrap();

    let (status, body) = decide(
        &app,
        id,
        app.faculty_leader,
        "REQUEST_REVISION",
        Some("fix X"),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "FACULTY_REQUIRES_REVISION");
    assert_eq!(body["faculty_revision_request"], "fix X");

    let (status, body) = request(
        &app.router,
        "POST",
        &format!("/v1/events/{id}/revision-response"),
        Some(json!({ "acting_user_id": app.student, "response": "fixed X" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "PENDING_FACULTY_APPROVAL");
    assert_eq!(body["faculty_revision_request"], "fix X");
    assert_eq!(body["faculty_revision_response"], "fixed X");

    // The faculty leader was renotified with the response embedded
    let inbox = app.notifications.list_for_user(app.faculty_leader).await.unwrap();
    let responded = inbox
        .iter()
        .find(|n| n.kind.as_str() == "REVISION_RESPONDED")
        .expect("revision response notification");
    assert!(responded.message.contains("Response: fixed X"));
    let payload = responded.payload.as_ref().unwrap();
    assert_eq!(payload.raw_text, "fixed X");
}

#[tokio::test]
async fn stranger_cannot_answer_a_revision_request() {
    let app = test_app().await;
    let event = submit(&app, "Book Club Fair").await;
    let id = event["id"].as_str().unwrap();

    decide(&app, id, app.faculty_leader, "REQUEST_REVISION", Some("shorten it")).await;

    let (status, _) = request(
        &app.router,
        "POST",
        &format!("/v1/events/{id}/revision-response"),
        Some(json!({ "acting_user_id": app.dean, "response": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn rejection_at_dean_tier_is_terminal() {
    let app = test_app().await;
    let event = submit(&app, "Gala Dinner").await;
    let id = event["id"].as_str().unwrap();

    decide(&app, id, app.faculty_leader, "APPROVE", None).await;
    let (status, body) = decide(&app, id, app.dean, "REJECT", Some("budget exceeded")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "DEAN_REJECTED");
    assert_eq!(body["dean_rejection_reason"], "budget exceeded");

    // Nothing moves a rejected event, not even the deanship
    for (user, decision, reason) in [
        (app.deanship, "APPROVE", None),
        (app.faculty_leader, "REQUEST_REVISION", Some("try again")),
        (app.dean, "REJECT", Some("again")),
    ] {
        let (status, _) = decide(&app, id, user, decision, reason).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    // Still queryable for audit
    let (status, fetched) = request(&app.router, "GET", &format!("/v1/events/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "DEAN_REJECTED");

    // Submitter was told, with the structured reason attached
    let inbox = app.notifications.list_for_user(app.student).await.unwrap();
    let rejected = inbox
        .iter()
        .find(|n| n.kind.as_str() == "EVENT_REJECTED")
        .expect("rejection notification");
    assert_eq!(rejected.payload.as_ref().unwrap().raw_text, "budget exceeded");
}

#[tokio::test]
async fn full_chain_with_dean_revision_loop() {
    let app = test_app().await;
    let event = submit(&app, "Science Week").await;
    let id = event["id"].as_str().unwrap();

    // Faculty approves: dean notified
    let (status, body) = decide(&app, id, app.faculty_leader, "APPROVE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "PENDING_DEAN_APPROVAL");
    let dean_inbox = app.notifications.list_for_user(app.dean).await.unwrap();
    assert_eq!(dean_inbox.len(), 1);
    assert_eq!(dean_inbox[0].kind.as_str(), "APPROVAL_ADVANCED");

    // Dean asks for a venue: submitter notified with the request text
    let (status, body) = decide(&app, id, app.dean, "REQUEST_REVISION", Some("need venue")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "DEAN_REQUIRES_REVISION");
    assert_eq!(body["dean_revision_request"], "need venue");
    let student_inbox = app.notifications.list_for_user(app.student).await.unwrap();
    let requested = student_inbox
        .iter()
        .find(|n| n.kind.as_str() == "REVISION_REQUESTED")
        .expect("revision request notification");
    assert!(requested.message.contains("requests revision for event \"Science Week\": need venue"));

    // Submitter answers: back to the dean, not the faculty leader
    let (status, body) = request(
        &app.router,
        "POST",
        &format!("/v1/events/{id}/revision-response"),
        Some(json!({ "acting_user_id": app.student, "response": "venue confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "PENDING_DEAN_APPROVAL");
    assert_eq!(body["dean_revision_response"], "venue confirmed");
    let dean_inbox = app.notifications.list_for_user(app.dean).await.unwrap();
    assert_eq!(dean_inbox.len(), 2);
    // Only the dean is renotified; the faculty leader inbox is untouched
    let faculty_inbox = app
        .notifications
        .list_for_user(app.faculty_leader)
        .await
        .unwrap();
    assert_eq!(faculty_inbox.len(), 1);

    // Dean approves, deanship pool notified
    let (status, body) = decide(&app, id, app.dean, "APPROVE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "PENDING_DEANSHIP_APPROVAL");
    let deanship_inbox = app.notifications.list_for_user(app.deanship).await.unwrap();
    assert_eq!(deanship_inbox.len(), 1);

    // Deanship approves: terminal, submitter notified
    let (status, body) = decide(&app, id, app.deanship, "APPROVE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "APPROVED");
    let student_inbox = app.notifications.list_for_user(app.student).await.unwrap();
    assert!(student_inbox
        .iter()
        .any(|n| n.kind.as_str() == "EVENT_APPROVED"));

    // Approved is terminal
    let (status, _) = decide(&app, id, app.deanship, "APPROVE", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The revision history kept the whole round
    let (status, rounds) = request(
        &app.router,
        "GET",
        &format!("/v1/events/{id}/revisions"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rounds = rounds["data"].as_array().unwrap();
    assert_eq!(rounds.len(), 1);
    assert_eq!(rounds[0]["tier"], "DEAN");
    assert_eq!(rounds[0]["request_text"], "need venue");
    assert_eq!(rounds[0]["response_text"], "venue confirmed");
}

#[tokio::test]
async fn pending_queue_is_scoped_by_role_and_college() {
    let app = test_app().await;
    let event = submit(&app, "Open Mic").await;
    let id = event["id"].as_str().unwrap();

    let (status, pending) = request(
        &app.router,
        "GET",
        &format!("/v1/events/pending?role=FACULTY_LEADER&college_id={}", app.college_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending["data"].as_array().unwrap().len(), 1);

    // Another college's leader sees nothing
    let (_, pending) = request(
        &app.router,
        "GET",
        &format!("/v1/events/pending?role=FACULTY_LEADER&college_id={}", Uuid::now_v7()),
        None,
    )
    .await;
    assert_eq!(pending["data"].as_array().unwrap().len(), 0);

    decide(&app, id, app.faculty_leader, "APPROVE", None).await;

    // The deanship queue is university-wide
    decide(&app, id, app.dean, "APPROVE", None).await;
    let (_, pending) = request(&app.router, "GET", "/v1/events/pending?role=DEANSHIP", None).await;
    assert_eq!(pending["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn notification_read_flow() {
    let app = test_app().await;
    submit(&app, "Quiz Night").await;
    submit(&app, "Chess Open").await;

    let uri = format!("/v1/notifications/unread-count?user_id={}", app.faculty_leader);
    let (_, count) = request(&app.router, "GET", &uri, None).await;
    assert_eq!(count["count"], 2);

    let (_, listed) = request(
        &app.router,
        "GET",
        &format!("/v1/notifications?user_id={}", app.faculty_leader),
        None,
    )
    .await;
    let first_id = listed["data"][0]["id"].as_str().unwrap().to_string();

    // Somebody else cannot mark it
    let (status, _) = request(
        &app.router,
        "POST",
        &format!("/v1/notifications/{first_id}/read"),
        Some(json!({ "user_id": app.dean })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &app.router,
        "POST",
        &format!("/v1/notifications/{first_id}/read"),
        Some(json!({ "user_id": app.faculty_leader })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, count) = request(&app.router, "GET", &uri, None).await;
    assert_eq!(count["count"], 1);

    let (_, flipped) = request(
        &app.router,
        "POST",
        "/v1/notifications/read-all",
        Some(json!({ "user_id": app.faculty_leader })),
    )
    .await;
    assert_eq!(flipped["count"], 1);

    let (_, count) = request(&app.router, "GET", &uri, None).await;
    assert_eq!(count["count"], 0);
}
