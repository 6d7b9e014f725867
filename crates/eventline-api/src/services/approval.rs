// Approval service: submission gateway + decision orchestration
//
// The one place that wires policy, state machine, stores, and notification
// fan-out together. The transition commit is the durability boundary;
// notification emission afterwards is best-effort and only ever logged.

use std::sync::Arc;
use uuid::Uuid;

use eventline_core::{
    can_respond_to_revision, notification, plan_transition, ApprovalAction, ApprovalError,
    CreateEvent, CreateNotification, Decision, Directory, Event, EventDraft, EventStatus,
    EventStore, NotificationDirective, NotificationKind, NotificationPayload, NotificationStore,
    OutcomeWrite, Result, RevisionRound, Role, Tier, TransitionPlan,
};

pub struct ApprovalService {
    events: Arc<dyn EventStore>,
    notifications: Arc<dyn NotificationStore>,
    directory: Arc<dyn Directory>,
}

impl ApprovalService {
    pub fn new(
        events: Arc<dyn EventStore>,
        notifications: Arc<dyn NotificationStore>,
        directory: Arc<dyn Directory>,
    ) -> Self {
        Self {
            events,
            notifications,
            directory,
        }
    }

    /// Submit a new event into the approval chain.
    ///
    /// The event's college is the community's college; the first pending
    /// tier's faculty leader is notified once the record is durable.
    pub async fn submit(
        &self,
        community_id: Uuid,
        creator_id: Uuid,
        draft: EventDraft,
    ) -> Result<Event> {
        draft.validate()?;

        let community = self
            .directory
            .community(community_id)
            .await?
            .ok_or_else(|| ApprovalError::NotFound(format!("community {community_id}")))?;
        self.directory
            .resolve_actor(creator_id)
            .await?
            .ok_or_else(|| ApprovalError::user_not_found(creator_id))?;

        let event = self
            .events
            .create(CreateEvent {
                title: draft.title,
                description: draft.description,
                starts_at: draft.starts_at,
                ends_at: draft.ends_at,
                capacity: draft.capacity,
                location: draft.location,
                college_id: community.college_id,
                community_id,
                created_by: creator_id,
                status: EventStatus::PendingFacultyApproval,
            })
            .await?;

        tracing::info!(event_id = %event.id, college_id = %event.college_id, "event submitted");

        let creator_name = self.actor_name(creator_id).await;
        let message = format!(
            "{creator_name} submitted event \"{}\" for approval",
            event.title
        );
        self.notify_tier(
            &event,
            Tier::Faculty,
            NotificationKind::EventSubmitted,
            message,
            None,
        )
        .await;

        Ok(event)
    }

    /// Apply one approver decision (approve / reject / request-revision).
    ///
    /// The actor's role and college come from the directory, never the
    /// request. A stale snapshot loses the conditional write and surfaces
    /// as Conflict for the caller to retry.
    pub async fn decide(
        &self,
        event_id: Uuid,
        acting_user_id: Uuid,
        decision: Decision,
        reason: Option<String>,
    ) -> Result<Event> {
        if decision == Decision::RespondRevision {
            return Err(ApprovalError::invalid(
                "revision responses go through the revision-response endpoint",
            ));
        }

        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or_else(|| ApprovalError::event_not_found(event_id))?;
        let actor = self
            .directory
            .resolve_actor(acting_user_id)
            .await?
            .ok_or_else(|| ApprovalError::user_not_found(acting_user_id))?;

        let action = ApprovalAction {
            event_id,
            actor,
            decision,
            reason,
        };
        let plan = plan_transition(&event, &action)?;
        let updated = self.events.apply_transition(&plan).await?;

        tracing::info!(
            event_id = %event_id,
            from = %plan.from,
            to = %plan.to,
            decision = %decision,
            "approval transition applied"
        );

        self.dispatch(&updated, &plan).await;
        Ok(updated)
    }

    /// Answer an outstanding revision request as the submitter.
    ///
    /// Returns the event to the pending state of the tier that asked, and
    /// renotifies exactly that tier's approvers.
    pub async fn respond_to_revision(
        &self,
        event_id: Uuid,
        acting_user_id: Uuid,
        response_text: String,
    ) -> Result<Event> {
        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or_else(|| ApprovalError::event_not_found(event_id))?;

        let community_leader = self
            .directory
            .community(event.community_id)
            .await?
            .map(|c| c.leader_id);
        if !can_respond_to_revision(acting_user_id, &event, community_leader) {
            return Err(ApprovalError::unauthorized(format!(
                "user {acting_user_id} may not respond to revisions on event {event_id}"
            )));
        }

        let action = ApprovalAction {
            event_id,
            actor: eventline_core::Actor::new(acting_user_id, Role::Student, None),
            decision: Decision::RespondRevision,
            reason: Some(response_text),
        };
        let plan = plan_transition(&event, &action)?;
        let updated = self.events.apply_transition(&plan).await?;

        tracing::info!(event_id = %event_id, to = %plan.to, "revision response applied");

        self.dispatch(&updated, &plan).await;
        Ok(updated)
    }

    /// Read-only pending queue for an approver role
    pub async fn list_pending_for_role(
        &self,
        role: Role,
        college_id: Option<Uuid>,
    ) -> Result<Vec<Event>> {
        let statuses: &[EventStatus] = match role {
            Role::FacultyLeader => &[EventStatus::PendingFacultyApproval],
            Role::DeanOfFaculty => &[EventStatus::PendingDeanApproval],
            Role::Deanship => &[EventStatus::PendingDeanshipApproval],
            Role::Student => {
                return Err(ApprovalError::invalid("students have no pending queue"))
            }
        };
        let college = match role {
            Role::Deanship => None,
            _ => college_id,
        };
        self.events.list_by_status(statuses, college).await
    }

    pub async fn get(&self, event_id: Uuid) -> Result<Option<Event>> {
        self.events.get(event_id).await
    }

    pub async fn list_revision_rounds(&self, event_id: Uuid) -> Result<Vec<RevisionRound>> {
        self.events
            .get(event_id)
            .await?
            .ok_or_else(|| ApprovalError::event_not_found(event_id))?;
        self.events.list_revision_rounds(event_id).await
    }

    // ------------------------------------------------------------------
    // Notification fan-out (best-effort, after the commit)
    // ------------------------------------------------------------------

    async fn dispatch(&self, event: &Event, plan: &TransitionPlan) {
        let actor_name = self.actor_name(plan.actor_id).await;
        let payload = match &plan.outcome {
            OutcomeWrite::RejectionReason { tier, reason } => Some(NotificationPayload {
                tier: *tier,
                kind: NotificationKind::EventRejected,
                raw_text: reason.clone(),
            }),
            OutcomeWrite::RevisionRequest { tier, request } => Some(NotificationPayload {
                tier: *tier,
                kind: NotificationKind::RevisionRequested,
                raw_text: request.clone(),
            }),
            OutcomeWrite::RevisionResponse { tier, response } => Some(NotificationPayload {
                tier: *tier,
                kind: NotificationKind::RevisionResponded,
                raw_text: response.clone(),
            }),
            OutcomeWrite::None => None,
        };

        match plan.notify {
            NotificationDirective::TierApprovers { tier, kind } => {
                let message = match (&plan.outcome, kind) {
                    (OutcomeWrite::RevisionResponse { response, .. }, _) => {
                        notification::revision_response_message(
                            &actor_name,
                            &event.title,
                            response,
                        )
                    }
                    _ => format!("Event \"{}\" is awaiting your approval", event.title),
                };
                self.notify_tier(event, tier, kind, message, payload).await;
            }
            NotificationDirective::Submitter { kind } => {
                let message = match &plan.outcome {
                    OutcomeWrite::RejectionReason { tier, reason } => {
                        notification::rejection_message(&event.title, *tier, reason)
                    }
                    OutcomeWrite::RevisionRequest { request, .. } => {
                        notification::revision_request_message(
                            &actor_name,
                            &event.title,
                            request,
                        )
                    }
                    _ => format!("Your event \"{}\" has been approved", event.title),
                };
                self.notify_user(event, event.created_by, kind, message, payload)
                    .await;
            }
        }
    }

    async fn notify_tier(
        &self,
        event: &Event,
        tier: Tier,
        kind: NotificationKind,
        message: String,
        payload: Option<NotificationPayload>,
    ) {
        let recipients = match self.directory.tier_recipients(tier, event.college_id).await {
            Ok(recipients) => recipients,
            Err(e) => {
                tracing::warn!(event_id = %event.id, %tier, "recipient lookup failed: {e}");
                return;
            }
        };
        if recipients.is_empty() {
            tracing::warn!(event_id = %event.id, %tier, "no approver bound for tier");
            return;
        }

        let inputs = recipients
            .into_iter()
            .map(|recipient_id| CreateNotification {
                recipient_id,
                kind,
                event_id: Some(event.id),
                message: message.clone(),
                payload: payload.clone(),
            })
            .collect();
        if let Err(e) = self.notifications.create_many(inputs).await {
            // Transition already durable; the echo is best-effort
            tracing::warn!(event_id = %event.id, "notification emission failed: {e}");
        }
    }

    async fn notify_user(
        &self,
        event: &Event,
        recipient_id: Uuid,
        kind: NotificationKind,
        message: String,
        payload: Option<NotificationPayload>,
    ) {
        let input = CreateNotification {
            recipient_id,
            kind,
            event_id: Some(event.id),
            message,
            payload,
        };
        if let Err(e) = self.notifications.create(input).await {
            tracing::warn!(event_id = %event.id, "notification emission failed: {e}");
        }
    }

    async fn actor_name(&self, user_id: Uuid) -> String {
        match self.directory.display_name(user_id).await {
            Ok(Some(name)) => name,
            _ => "Someone".to_string(),
        }
    }
}
