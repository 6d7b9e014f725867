// Revision round audit log
//
// Append-only: a new REQUEST_REVISION at a tier starts a new round, a
// RESPOND_REVISION closes the latest open round. The event's snapshot
// fields hold only the latest round per tier; nothing here is overwritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::event::Tier;

/// One request-then-response cycle at a given tier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RevisionRound {
    pub id: Uuid,
    pub event_id: Uuid,
    pub tier: Tier,
    pub requested_by: Uuid,
    pub request_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,
    pub requested_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
}

impl RevisionRound {
    /// True until the submitter has answered
    pub fn is_open(&self) -> bool {
        self.response_text.is_none()
    }
}
