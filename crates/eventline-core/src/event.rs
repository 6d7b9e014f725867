// Event domain types
//
// The Event entity and its approval status. Used by API, storage, and the
// state machine. Status strings are stored as-is in Postgres and on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::ApprovalError;

/// Approval tier: the three sequential human checkpoints
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Faculty,
    Dean,
    Deanship,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Faculty => "FACULTY",
            Tier::Dean => "DEAN",
            Tier::Deanship => "DEANSHIP",
        }
    }

    /// The pending state this tier evaluates
    pub fn pending_status(&self) -> EventStatus {
        match self {
            Tier::Faculty => EventStatus::PendingFacultyApproval,
            Tier::Dean => EventStatus::PendingDeanApproval,
            Tier::Deanship => EventStatus::PendingDeanshipApproval,
        }
    }

    /// The revision-wait state this tier parks an event in
    pub fn revision_status(&self) -> EventStatus {
        match self {
            Tier::Faculty => EventStatus::FacultyRequiresRevision,
            Tier::Dean => EventStatus::DeanRequiresRevision,
            Tier::Deanship => EventStatus::DeanshipRequiresRevision,
        }
    }

    /// The terminal rejection state for this tier
    pub fn rejected_status(&self) -> EventStatus {
        match self {
            Tier::Faculty => EventStatus::FacultyRejected,
            Tier::Dean => EventStatus::DeanRejected,
            Tier::Deanship => EventStatus::DeanshipRejected,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Tier {
    type Error = ApprovalError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "FACULTY" => Ok(Tier::Faculty),
            "DEAN" => Ok(Tier::Dean),
            "DEANSHIP" => Ok(Tier::Deanship),
            other => Err(ApprovalError::invalid(format!("unknown tier: {other}"))),
        }
    }
}

/// Event approval status
///
/// The only ten values an event can ever hold. Terminal: Approved and the
/// three *Rejected states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    PendingFacultyApproval,
    PendingDeanApproval,
    PendingDeanshipApproval,
    FacultyRequiresRevision,
    DeanRequiresRevision,
    DeanshipRequiresRevision,
    Approved,
    FacultyRejected,
    DeanRejected,
    DeanshipRejected,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::PendingFacultyApproval => "PENDING_FACULTY_APPROVAL",
            EventStatus::PendingDeanApproval => "PENDING_DEAN_APPROVAL",
            EventStatus::PendingDeanshipApproval => "PENDING_DEANSHIP_APPROVAL",
            EventStatus::FacultyRequiresRevision => "FACULTY_REQUIRES_REVISION",
            EventStatus::DeanRequiresRevision => "DEAN_REQUIRES_REVISION",
            EventStatus::DeanshipRequiresRevision => "DEANSHIP_REQUIRES_REVISION",
            EventStatus::Approved => "APPROVED",
            EventStatus::FacultyRejected => "FACULTY_REJECTED",
            EventStatus::DeanRejected => "DEAN_REJECTED",
            EventStatus::DeanshipRejected => "DEANSHIP_REJECTED",
        }
    }

    /// True for states no decide/respond call can ever leave
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EventStatus::Approved
                | EventStatus::FacultyRejected
                | EventStatus::DeanRejected
                | EventStatus::DeanshipRejected
        )
    }

    /// The tier waiting to evaluate, if this is a pending state
    pub fn pending_tier(&self) -> Option<Tier> {
        match self {
            EventStatus::PendingFacultyApproval => Some(Tier::Faculty),
            EventStatus::PendingDeanApproval => Some(Tier::Dean),
            EventStatus::PendingDeanshipApproval => Some(Tier::Deanship),
            _ => None,
        }
    }

    /// The tier whose revision request is outstanding, if any
    pub fn revision_tier(&self) -> Option<Tier> {
        match self {
            EventStatus::FacultyRequiresRevision => Some(Tier::Faculty),
            EventStatus::DeanRequiresRevision => Some(Tier::Dean),
            EventStatus::DeanshipRequiresRevision => Some(Tier::Deanship),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for EventStatus {
    type Error = ApprovalError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "PENDING_FACULTY_APPROVAL" => Ok(EventStatus::PendingFacultyApproval),
            "PENDING_DEAN_APPROVAL" => Ok(EventStatus::PendingDeanApproval),
            "PENDING_DEANSHIP_APPROVAL" => Ok(EventStatus::PendingDeanshipApproval),
            "FACULTY_REQUIRES_REVISION" => Ok(EventStatus::FacultyRequiresRevision),
            "DEAN_REQUIRES_REVISION" => Ok(EventStatus::DeanRequiresRevision),
            "DEANSHIP_REQUIRES_REVISION" => Ok(EventStatus::DeanshipRequiresRevision),
            "APPROVED" => Ok(EventStatus::Approved),
            "FACULTY_REJECTED" => Ok(EventStatus::FacultyRejected),
            "DEAN_REJECTED" => Ok(EventStatus::DeanRejected),
            "DEANSHIP_REJECTED" => Ok(EventStatus::DeanshipRejected),
            other => Err(ApprovalError::invalid(format!(
                "unknown event status: {other}"
            ))),
        }
    }
}

/// A campus event moving through the approval chain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    pub location: String,
    pub college_id: Uuid,
    pub community_id: Uuid,
    pub created_by: Uuid,
    pub status: EventStatus,
    // Per-tier outcome slots. Exactly one of {nothing, rejection reason,
    // revision request} is populated per tier; tiers not yet reached stay null.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dean_rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deanship_rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_revision_request: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dean_revision_request: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deanship_revision_request: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_revision_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dean_revision_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deanship_revision_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Latest revision request snapshot for a tier
    pub fn revision_request(&self, tier: Tier) -> Option<&str> {
        match tier {
            Tier::Faculty => self.faculty_revision_request.as_deref(),
            Tier::Dean => self.dean_revision_request.as_deref(),
            Tier::Deanship => self.deanship_revision_request.as_deref(),
        }
    }

    /// Latest revision response snapshot for a tier
    pub fn revision_response(&self, tier: Tier) -> Option<&str> {
        match tier {
            Tier::Faculty => self.faculty_revision_response.as_deref(),
            Tier::Dean => self.dean_revision_response.as_deref(),
            Tier::Deanship => self.deanship_revision_response.as_deref(),
        }
    }

    /// Rejection reason for a tier, if it rejected
    pub fn rejection_reason(&self, tier: Tier) -> Option<&str> {
        match tier {
            Tier::Faculty => self.faculty_rejection_reason.as_deref(),
            Tier::Dean => self.dean_rejection_reason.as_deref(),
            Tier::Deanship => self.deanship_rejection_reason.as_deref(),
        }
    }
}

/// Submitter-provided fields for a new event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub capacity: Option<i32>,
    pub location: String,
}

impl EventDraft {
    /// Validate submitter input before anything is written
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.title.trim().is_empty() {
            return Err(ApprovalError::invalid("event title must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(ApprovalError::invalid(
                "event description must not be empty",
            ));
        }
        if self.location.trim().is_empty() {
            return Err(ApprovalError::invalid("event location must not be empty"));
        }
        if let Some(ends_at) = self.ends_at {
            if ends_at <= self.starts_at {
                return Err(ApprovalError::invalid("event must end after it starts"));
            }
        }
        if let Some(capacity) = self.capacity {
            if capacity < 0 {
                return Err(ApprovalError::invalid("capacity must not be negative"));
            }
        }
        Ok(())
    }
}

/// What an approver (or the submitter, for revision responses) asked for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approve,
    Reject,
    RequestRevision,
    RespondRevision,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Decision::Approve => "APPROVE",
            Decision::Reject => "REJECT",
            Decision::RequestRevision => "REQUEST_REVISION",
            Decision::RespondRevision => "RESPOND_REVISION",
        };
        f.write_str(s)
    }
}

/// One approval action against one event. Ephemeral: validated, applied,
/// never persisted as its own entity.
#[derive(Debug, Clone)]
pub struct ApprovalAction {
    pub event_id: Uuid,
    pub actor: crate::role::Actor,
    pub decision: Decision,
    /// Reason / revision-request / revision-response text.
    /// Mandatory for Reject, RequestRevision, RespondRevision; ignored for Approve.
    pub reason: Option<String>,
}
