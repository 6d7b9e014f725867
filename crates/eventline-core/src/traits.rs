// Core traits for pluggable backends
//
// These traits allow the approval chain to run against different backends:
// - In-memory implementations for examples and testing
// - Postgres implementations in eventline-storage for production

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::event::{Event, EventStatus, Tier};
use crate::machine::TransitionPlan;
use crate::notification::{CreateNotification, Notification};
use crate::revision::RevisionRound;
use crate::role::Actor;

// ============================================================================
// EventStore - Durable event records with conditional status writes
// ============================================================================

/// Input for creating a new event record
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub location: String,
    pub college_id: Uuid,
    pub community_id: Uuid,
    pub created_by: Uuid,
    /// Always PendingFacultyApproval for fresh submissions
    pub status: EventStatus,
}

/// Trait for storing events and applying approval transitions
///
/// `apply_transition` is the durability boundary of the whole system: it
/// must write the new status and the plan's outcome fields together,
/// conditioned on the status still matching `plan.from`. Revision-round
/// bookkeeping (append on request, close on response) happens inside the
/// same application so nothing is half-written.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Create a new event record
    async fn create(&self, input: CreateEvent) -> Result<Event>;

    /// Fetch an event by id
    async fn get(&self, id: Uuid) -> Result<Option<Event>>;

    /// Apply a planned transition with compare-and-swap semantics on status.
    ///
    /// Errors with `Conflict` if the status no longer matches `plan.from`,
    /// `NotFound` if the event does not exist. No partial writes either way.
    async fn apply_transition(&self, plan: &TransitionPlan) -> Result<Event>;

    /// Events currently in any of `statuses`, optionally restricted to a college
    async fn list_by_status(
        &self,
        statuses: &[EventStatus],
        college_id: Option<Uuid>,
    ) -> Result<Vec<Event>>;

    /// Append-only revision history for an event, oldest first
    async fn list_revision_rounds(&self, event_id: Uuid) -> Result<Vec<RevisionRound>>;
}

// ============================================================================
// NotificationStore - Persisted in-app notifications
// ============================================================================

/// Trait for persisting and reading notifications
///
/// Creation never fails for recipient-not-found: the record is the product,
/// delivery to a live client is a transport concern outside this core.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist a single notification
    async fn create(&self, input: CreateNotification) -> Result<Notification>;

    /// Persist one notification per recipient (fan-out extension point)
    async fn create_many(&self, inputs: Vec<CreateNotification>) -> Result<Vec<Notification>> {
        let mut out = Vec::with_capacity(inputs.len());
        for input in inputs {
            out.push(self.create(input).await?);
        }
        Ok(out)
    }

    /// All notifications for a recipient, newest first
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>>;

    /// Count of unread notifications for a recipient
    async fn unread_count(&self, user_id: Uuid) -> Result<u64>;

    /// Mark one notification read. False if it does not exist or belongs
    /// to someone else.
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool>;

    /// Mark everything read for a recipient; returns how many flipped
    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64>;
}

// ============================================================================
// Directory - Read-only user / community / college reference data
// ============================================================================

/// A community resolved from the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommunityRef {
    pub id: Uuid,
    pub college_id: Uuid,
    pub leader_id: Uuid,
}

/// Trait for the user/role/community directory this core consumes
#[async_trait]
pub trait Directory: Send + Sync {
    /// Resolve a user into their role and college binding
    async fn resolve_actor(&self, user_id: Uuid) -> Result<Option<Actor>>;

    /// Human display name, for notification message rendering
    async fn display_name(&self, user_id: Uuid) -> Result<Option<String>>;

    /// Resolve a community and its designated leader
    async fn community(&self, community_id: Uuid) -> Result<Option<CommunityRef>>;

    /// Users who approve at `tier` for the given college: the college's
    /// faculty leader or dean (at most one each), or the university-wide
    /// deanship pool.
    async fn tier_recipients(&self, tier: Tier, college_id: Uuid) -> Result<Vec<Uuid>>;
}
