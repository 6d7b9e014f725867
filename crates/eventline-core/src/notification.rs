// Notification domain types
//
// A notification is a derived, best-effort echo of a committed transition.
// It carries both a rendered message (with the "Response:" / "requests
// revision" markers legacy renderers scrape) and a structured payload so
// new renderers never have to parse the text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::event::Tier;

/// Notification kind, one value per transition kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// New submission waiting at the faculty tier
    EventSubmitted,
    /// A tier approved; the next tier has work
    ApprovalAdvanced,
    /// Final tier approved; submitter informed
    EventApproved,
    /// A tier rejected; submitter informed
    EventRejected,
    /// A tier asked the submitter for changes
    RevisionRequested,
    /// Submitter answered; the requesting tier re-evaluates
    RevisionResponded,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::EventSubmitted => "EVENT_SUBMITTED",
            NotificationKind::ApprovalAdvanced => "APPROVAL_ADVANCED",
            NotificationKind::EventApproved => "EVENT_APPROVED",
            NotificationKind::EventRejected => "EVENT_REJECTED",
            NotificationKind::RevisionRequested => "REVISION_REQUESTED",
            NotificationKind::RevisionResponded => "REVISION_RESPONDED",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for NotificationKind {
    type Error = crate::error::ApprovalError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "EVENT_SUBMITTED" => Ok(NotificationKind::EventSubmitted),
            "APPROVAL_ADVANCED" => Ok(NotificationKind::ApprovalAdvanced),
            "EVENT_APPROVED" => Ok(NotificationKind::EventApproved),
            "EVENT_REJECTED" => Ok(NotificationKind::EventRejected),
            "REVISION_REQUESTED" => Ok(NotificationKind::RevisionRequested),
            "REVISION_RESPONDED" => Ok(NotificationKind::RevisionResponded),
            other => Err(crate::error::ApprovalError::invalid(format!(
                "unknown notification kind: {other}"
            ))),
        }
    }
}

/// Structured payload attached to revision-related notifications
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NotificationPayload {
    pub tier: Tier,
    pub kind: NotificationKind,
    /// Raw reason / request / response text, unrendered
    pub raw_text: String,
}

/// An in-app notification owned by exactly one recipient
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub kind: NotificationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Uuid>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<NotificationPayload>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a notification record
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub recipient_id: Uuid,
    pub kind: NotificationKind,
    pub event_id: Option<Uuid>,
    pub message: String,
    pub payload: Option<NotificationPayload>,
}

/// Render the revision-request message.
/// Keeps the marker format legacy renderers extract the reason from.
pub fn revision_request_message(actor_name: &str, event_title: &str, reason: &str) -> String {
    format!("{actor_name} requests revision for event \"{event_title}\": {reason}")
}

/// Render the revision-response message, "Response:" marker included.
pub fn revision_response_message(actor_name: &str, event_title: &str, response: &str) -> String {
    format!("{actor_name} answered the revision request for event \"{event_title}\". Response: {response}")
}

/// Render the rejection message sent to the submitter.
pub fn rejection_message(event_title: &str, tier: Tier, reason: &str) -> String {
    format!("Your event \"{event_title}\" was rejected at the {tier} tier: {reason}")
}
