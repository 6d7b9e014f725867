// In-memory implementations for examples and testing
//
// These implementations keep all data in memory, making them perfect for:
// - Unit and router tests that don't need a database
// - Quick prototyping
//
// The event store reproduces the conditional-status-write contract: a
// transition whose snapshot status is stale fails with Conflict, exactly
// like the Postgres implementation.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ApprovalError, Result};
use crate::event::{Event, EventStatus, Tier};
use crate::machine::{OutcomeWrite, TransitionPlan};
use crate::notification::{CreateNotification, Notification};
use crate::revision::RevisionRound;
use crate::role::{Actor, Role};
use crate::traits::{
    CommunityRef, CreateEvent, Directory, EventStore, NotificationStore,
};

// ============================================================================
// InMemoryEventStore - Events and revision rounds in a HashMap
// ============================================================================

/// In-memory event store with CAS transition semantics
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventStore {
    inner: Arc<RwLock<EventStoreInner>>,
}

#[derive(Debug, Default)]
struct EventStoreInner {
    events: HashMap<Uuid, Event>,
    rounds: HashMap<Uuid, Vec<RevisionRound>>,
}

impl InMemoryEventStore {
    /// Create a new in-memory event store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all events and rounds
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.events.clear();
        inner.rounds.clear();
    }

    /// Pre-populate with an event (useful for testing)
    pub async fn seed(&self, event: Event) {
        self.inner.write().await.events.insert(event.id, event);
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn create(&self, input: CreateEvent) -> Result<Event> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            capacity: input.capacity,
            location: input.location,
            college_id: input.college_id,
            community_id: input.community_id,
            created_by: input.created_by,
            status: input.status,
            faculty_rejection_reason: None,
            dean_rejection_reason: None,
            deanship_rejection_reason: None,
            faculty_revision_request: None,
            dean_revision_request: None,
            deanship_revision_request: None,
            faculty_revision_response: None,
            dean_revision_response: None,
            deanship_revision_response: None,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .write()
            .await
            .events
            .insert(event.id, event.clone());
        Ok(event)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self.inner.read().await.events.get(&id).cloned())
    }

    async fn apply_transition(&self, plan: &TransitionPlan) -> Result<Event> {
        let mut inner = self.inner.write().await;
        let EventStoreInner { events, rounds } = &mut *inner;
        let event = events
            .get_mut(&plan.event_id)
            .ok_or_else(|| ApprovalError::event_not_found(plan.event_id))?;

        if event.status != plan.from {
            return Err(ApprovalError::conflict(plan.from.as_str()));
        }

        let now = Utc::now();
        event.status = plan.to;
        event.updated_at = now;

        match &plan.outcome {
            OutcomeWrite::None => {}
            OutcomeWrite::RejectionReason { tier, reason } => match tier {
                Tier::Faculty => event.faculty_rejection_reason = Some(reason.clone()),
                Tier::Dean => event.dean_rejection_reason = Some(reason.clone()),
                Tier::Deanship => event.deanship_rejection_reason = Some(reason.clone()),
            },
            OutcomeWrite::RevisionRequest { tier, request } => {
                // New round: snapshot pair replaced, response cleared
                match tier {
                    Tier::Faculty => {
                        event.faculty_revision_request = Some(request.clone());
                        event.faculty_revision_response = None;
                    }
                    Tier::Dean => {
                        event.dean_revision_request = Some(request.clone());
                        event.dean_revision_response = None;
                    }
                    Tier::Deanship => {
                        event.deanship_revision_request = Some(request.clone());
                        event.deanship_revision_response = None;
                    }
                }
                rounds.entry(plan.event_id).or_default().push(RevisionRound {
                    id: Uuid::now_v7(),
                    event_id: plan.event_id,
                    tier: *tier,
                    requested_by: plan.actor_id,
                    request_text: request.clone(),
                    responded_by: None,
                    response_text: None,
                    requested_at: now,
                    responded_at: None,
                });
            }
            OutcomeWrite::RevisionResponse { tier, response } => {
                match tier {
                    Tier::Faculty => event.faculty_revision_response = Some(response.clone()),
                    Tier::Dean => event.dean_revision_response = Some(response.clone()),
                    Tier::Deanship => event.deanship_revision_response = Some(response.clone()),
                }
                if let Some(round) = rounds
                    .entry(plan.event_id)
                    .or_default()
                    .iter_mut()
                    .rev()
                    .find(|r| r.tier == *tier && r.is_open())
                {
                    round.responded_by = Some(plan.actor_id);
                    round.response_text = Some(response.clone());
                    round.responded_at = Some(now);
                }
            }
        }

        Ok(events[&plan.event_id].clone())
    }

    async fn list_by_status(
        &self,
        statuses: &[EventStatus],
        college_id: Option<Uuid>,
    ) -> Result<Vec<Event>> {
        let inner = self.inner.read().await;
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| statuses.contains(&e.status))
            .filter(|e| college_id.map_or(true, |c| e.college_id == c))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.created_at);
        Ok(events)
    }

    async fn list_revision_rounds(&self, event_id: Uuid) -> Result<Vec<RevisionRound>> {
        Ok(self
            .inner
            .read()
            .await
            .rounds
            .get(&event_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// InMemoryNotificationStore - Notifications in a Vec per recipient
// ============================================================================

/// In-memory notification store
#[derive(Debug, Default, Clone)]
pub struct InMemoryNotificationStore {
    notifications: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationStore {
    /// Create a new in-memory notification store
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored notifications, in creation order (useful for testing)
    pub async fn all(&self) -> Vec<Notification> {
        self.notifications.read().await.clone()
    }

    /// Clear all notifications
    pub async fn clear(&self) {
        self.notifications.write().await.clear();
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn create(&self, input: CreateNotification) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::now_v7(),
            recipient_id: input.recipient_id,
            kind: input.kind,
            event_id: input.event_id,
            message: input.message,
            payload: input.payload,
            read: false,
            created_at: Utc::now(),
        };
        self.notifications
            .write()
            .await
            .push(notification.clone());
        Ok(notification)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let mut out: Vec<Notification> = self
            .notifications
            .read()
            .await
            .iter()
            .filter(|n| n.recipient_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn unread_count(&self, user_id: Uuid) -> Result<u64> {
        Ok(self
            .notifications
            .read()
            .await
            .iter()
            .filter(|n| n.recipient_id == user_id && !n.read)
            .count() as u64)
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut notifications = self.notifications.write().await;
        match notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == user_id)
        {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let mut notifications = self.notifications.write().await;
        let mut flipped = 0;
        for n in notifications
            .iter_mut()
            .filter(|n| n.recipient_id == user_id && !n.read)
        {
            n.read = true;
            flipped += 1;
        }
        Ok(flipped)
    }
}

// ============================================================================
// InMemoryDirectory - Users, communities, and tier bindings
// ============================================================================

/// In-memory user/community directory
#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectory {
    inner: Arc<RwLock<DirectoryInner>>,
}

#[derive(Debug, Default)]
struct DirectoryInner {
    users: HashMap<Uuid, (Actor, String)>,
    communities: HashMap<Uuid, CommunityRef>,
}

impl InMemoryDirectory {
    /// Create a new in-memory directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with their role and college binding
    pub async fn add_user(
        &self,
        user_id: Uuid,
        name: impl Into<String>,
        role: Role,
        college_id: Option<Uuid>,
    ) {
        self.inner
            .write()
            .await
            .users
            .insert(user_id, (Actor::new(user_id, role, college_id), name.into()));
    }

    /// Register a community with its college and designated leader
    pub async fn add_community(&self, community_id: Uuid, college_id: Uuid, leader_id: Uuid) {
        self.inner.write().await.communities.insert(
            community_id,
            CommunityRef {
                id: community_id,
                college_id,
                leader_id,
            },
        );
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn resolve_actor(&self, user_id: Uuid) -> Result<Option<Actor>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .get(&user_id)
            .map(|(actor, _)| *actor))
    }

    async fn display_name(&self, user_id: Uuid) -> Result<Option<String>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .get(&user_id)
            .map(|(_, name)| name.clone()))
    }

    async fn community(&self, community_id: Uuid) -> Result<Option<CommunityRef>> {
        Ok(self.inner.read().await.communities.get(&community_id).copied())
    }

    async fn tier_recipients(&self, tier: Tier, college_id: Uuid) -> Result<Vec<Uuid>> {
        let inner = self.inner.read().await;
        let recipients = inner
            .users
            .values()
            .filter(|(actor, _)| match tier {
                Tier::Faculty => {
                    actor.role == Role::FacultyLeader && actor.college_id == Some(college_id)
                }
                Tier::Dean => {
                    actor.role == Role::DeanOfFaculty && actor.college_id == Some(college_id)
                }
                // University-wide pool, college ignored
                Tier::Deanship => actor.role == Role::Deanship,
            })
            .map(|(actor, _)| actor.user_id)
            .collect();
        Ok(recipients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ApprovalAction, Decision};
    use crate::machine::plan_transition;

    fn create_input(college_id: Uuid, community_id: Uuid, created_by: Uuid) -> CreateEvent {
        CreateEvent {
            title: "Hack Night".into(),
            description: "Overnight hackathon".into(),
            starts_at: Utc::now(),
            ends_at: None,
            capacity: Some(120),
            location: "Lab 3".into(),
            college_id,
            community_id,
            created_by,
            status: EventStatus::PendingFacultyApproval,
        }
    }

    #[tokio::test]
    async fn stale_transition_conflicts() {
        let store = InMemoryEventStore::new();
        let college = Uuid::now_v7();
        let event = store
            .create(create_input(college, Uuid::now_v7(), Uuid::now_v7()))
            .await
            .unwrap();

        let action = ApprovalAction {
            event_id: event.id,
            actor: Actor::new(Uuid::now_v7(), Role::FacultyLeader, Some(college)),
            decision: Decision::Approve,
            reason: None,
        };
        let plan = plan_transition(&event, &action).unwrap();

        // First apply wins
        let advanced = store.apply_transition(&plan).await.unwrap();
        assert_eq!(advanced.status, EventStatus::PendingDeanApproval);

        // Replaying the same plan from the stale snapshot loses
        let err = store.apply_transition(&plan).await.unwrap_err();
        assert!(matches!(err, ApprovalError::Conflict { .. }));
    }

    #[tokio::test]
    async fn revision_rounds_are_append_only() {
        let store = InMemoryEventStore::new();
        let college = Uuid::now_v7();
        let creator = Uuid::now_v7();
        let dean = Actor::new(Uuid::now_v7(), Role::DeanOfFaculty, Some(college));

        let mut event = store
            .create(create_input(college, Uuid::now_v7(), creator))
            .await
            .unwrap();
        event.status = EventStatus::PendingDeanApproval;
        store.seed(event.clone()).await;

        // Round one: request + response
        let request = ApprovalAction {
            event_id: event.id,
            actor: dean,
            decision: Decision::RequestRevision,
            reason: Some("need venue".into()),
        };
        let event = store
            .apply_transition(&plan_transition(&event, &request).unwrap())
            .await
            .unwrap();

        let respond = ApprovalAction {
            event_id: event.id,
            actor: Actor::new(creator, Role::Student, None),
            decision: Decision::RespondRevision,
            reason: Some("venue confirmed".into()),
        };
        let event = store
            .apply_transition(&plan_transition(&event, &respond).unwrap())
            .await
            .unwrap();

        // Round two: a second request replaces the snapshot pair only
        let request2 = ApprovalAction {
            event_id: event.id,
            actor: dean,
            decision: Decision::RequestRevision,
            reason: Some("need budget sheet".into()),
        };
        let event = store
            .apply_transition(&plan_transition(&event, &request2).unwrap())
            .await
            .unwrap();

        assert_eq!(event.dean_revision_request.as_deref(), Some("need budget sheet"));
        assert_eq!(event.dean_revision_response, None);

        let rounds = store.list_revision_rounds(event.id).await.unwrap();
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0].request_text, "need venue");
        assert_eq!(rounds[0].response_text.as_deref(), Some("venue confirmed"));
        assert!(rounds[1].is_open());
    }

    #[tokio::test]
    async fn mark_read_is_owner_scoped() {
        let store = InMemoryNotificationStore::new();
        let owner = Uuid::now_v7();
        let n = store
            .create(CreateNotification {
                recipient_id: owner,
                kind: crate::notification::NotificationKind::EventSubmitted,
                event_id: None,
                message: "new submission".into(),
                payload: None,
            })
            .await
            .unwrap();

        assert!(!store.mark_read(n.id, Uuid::now_v7()).await.unwrap());
        assert!(store.mark_read(n.id, owner).await.unwrap());
        assert_eq!(store.unread_count(owner).await.unwrap(), 0);
    }
}
