// Database models (internal, may differ from public DTOs)
//
// Status, role, tier, and notification-kind columns are TEXT holding the
// canonical SCREAMING_SNAKE_CASE strings; conversion back into the closed
// enums happens at the row boundary and a bad value is a storage error.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use eventline_core::{
    ApprovalError, Event, EventStatus, Notification, NotificationKind, NotificationPayload,
    RevisionRound, Tier,
};

// ============================================
// Event models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub location: String,
    pub college_id: Uuid,
    pub community_id: Uuid,
    pub created_by: Uuid,
    pub status: String,
    pub faculty_rejection_reason: Option<String>,
    pub dean_rejection_reason: Option<String>,
    pub deanship_rejection_reason: Option<String>,
    pub faculty_revision_request: Option<String>,
    pub dean_revision_request: Option<String>,
    pub deanship_revision_request: Option<String>,
    pub faculty_revision_response: Option<String>,
    pub dean_revision_response: Option<String>,
    pub deanship_revision_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = ApprovalError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let status = EventStatus::try_from(row.status.as_str())
            .map_err(|_| ApprovalError::storage(format!("corrupt status: {}", row.status)))?;
        Ok(Event {
            id: row.id,
            title: row.title,
            description: row.description,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            capacity: row.capacity,
            location: row.location,
            college_id: row.college_id,
            community_id: row.community_id,
            created_by: row.created_by,
            status,
            faculty_rejection_reason: row.faculty_rejection_reason,
            dean_rejection_reason: row.dean_rejection_reason,
            deanship_rejection_reason: row.deanship_rejection_reason,
            faculty_revision_request: row.faculty_revision_request,
            dean_revision_request: row.dean_revision_request,
            deanship_revision_request: row.deanship_revision_request,
            faculty_revision_response: row.faculty_revision_response,
            dean_revision_response: row.dean_revision_response,
            deanship_revision_response: row.deanship_revision_response,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateEventRow {
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub location: String,
    pub college_id: Uuid,
    pub community_id: Uuid,
    pub created_by: Uuid,
    pub status: String,
}

// ============================================
// Revision round models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct RevisionRoundRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub tier: String,
    pub requested_by: Uuid,
    pub request_text: String,
    pub responded_by: Option<Uuid>,
    pub response_text: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl TryFrom<RevisionRoundRow> for RevisionRound {
    type Error = ApprovalError;

    fn try_from(row: RevisionRoundRow) -> Result<Self, Self::Error> {
        let tier = Tier::try_from(row.tier.as_str())
            .map_err(|_| ApprovalError::storage(format!("corrupt tier: {}", row.tier)))?;
        Ok(RevisionRound {
            id: row.id,
            event_id: row.event_id,
            tier,
            requested_by: row.requested_by,
            request_text: row.request_text,
            responded_by: row.responded_by,
            response_text: row.response_text,
            requested_at: row.requested_at,
            responded_at: row.responded_at,
        })
    }
}

// ============================================
// Notification models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub kind: String,
    pub event_id: Option<Uuid>,
    pub message: String,
    pub payload: Option<sqlx::types::JsonValue>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = ApprovalError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let kind = NotificationKind::try_from(row.kind.as_str())
            .map_err(|_| ApprovalError::storage(format!("corrupt kind: {}", row.kind)))?;
        let payload = row
            .payload
            .map(serde_json::from_value::<NotificationPayload>)
            .transpose()
            .map_err(|e| ApprovalError::storage(format!("corrupt payload: {e}")))?;
        Ok(Notification {
            id: row.id,
            recipient_id: row.recipient_id,
            kind,
            event_id: row.event_id,
            message: row.message,
            payload,
            read: row.read,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateNotificationRow {
    pub recipient_id: Uuid,
    pub kind: String,
    pub event_id: Option<Uuid>,
    pub message: String,
    pub payload: Option<serde_json::Value>,
}

// ============================================
// Directory models (read-only reference data)
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub college_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommunityRow {
    pub id: Uuid,
    pub name: String,
    pub college_id: Uuid,
    pub leader_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CollegeRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
