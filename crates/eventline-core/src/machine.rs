// Event approval state machine
//
// `plan_transition` is pure: it validates an action against an event
// snapshot and produces a TransitionPlan describing exactly what to write
// and who to notify. Backends apply the plan conditionally on the status
// being unchanged since the snapshot was read; a lost race surfaces as
// Conflict and the caller retries from a fresh read. Status and outcome
// fields are written together, all-or-nothing.

use crate::error::{ApprovalError, Result};
use crate::event::{ApprovalAction, Decision, Event, EventStatus, Tier};
use crate::notification::NotificationKind;
use crate::policy::eligible_actor;
use crate::role::RoleScope;

/// The single field write a transition performs alongside the status change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeWrite {
    /// Approve writes no outcome field
    None,
    /// Terminal rejection at `tier`
    RejectionReason { tier: Tier, reason: String },
    /// New revision round at `tier`; replaces the tier's snapshot pair
    /// (the previous response snapshot is cleared)
    RevisionRequest { tier: Tier, request: String },
    /// Submitter's answer closing the tier's open round
    RevisionResponse { tier: Tier, response: String },
}

/// Who must hear about a committed transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationDirective {
    /// The approvers of `tier` have new work (fresh submission, advance,
    /// or a revision response to re-evaluate)
    TierApprovers { tier: Tier, kind: NotificationKind },
    /// The event's submitter is told of a reject / revision request /
    /// final approval
    Submitter { kind: NotificationKind },
}

/// A validated transition, ready for conditional application
#[derive(Debug, Clone)]
pub struct TransitionPlan {
    pub event_id: uuid::Uuid,
    /// Who performed the action; recorded on revision rounds
    pub actor_id: uuid::Uuid,
    /// Status the plan was computed against; the CAS guard
    pub from: EventStatus,
    pub to: EventStatus,
    pub outcome: OutcomeWrite,
    pub notify: NotificationDirective,
}

/// Validate `action` against the `event` snapshot and plan the transition.
///
/// No mutation happens here. Identity checks for RESPOND_REVISION (creator
/// or community leader) are the submission gateway's responsibility; this
/// function enforces status legality, role legality for approver decisions,
/// and reason-text presence.
pub fn plan_transition(event: &Event, action: &ApprovalAction) -> Result<TransitionPlan> {
    if event.status.is_terminal() {
        return Err(ApprovalError::unauthorized(format!(
            "event {} is in terminal state {}",
            event.id, event.status
        )));
    }

    match action.decision {
        Decision::Approve | Decision::Reject | Decision::RequestRevision => {
            plan_approver_decision(event, action)
        }
        Decision::RespondRevision => plan_revision_response(event, action),
    }
}

fn plan_approver_decision(event: &Event, action: &ApprovalAction) -> Result<TransitionPlan> {
    let tier = event.status.pending_tier().ok_or_else(|| {
        ApprovalError::unauthorized(format!(
            "no approver decision is legal while event {} is {}",
            event.id, event.status
        ))
    })?;

    let eligible = eligible_actor(event.status).ok_or_else(|| {
        ApprovalError::unauthorized(format!(
            "no approver role is bound to status {}",
            event.status
        ))
    })?;

    if action.actor.role != eligible.role {
        return Err(ApprovalError::unauthorized(format!(
            "role {} may not act on {}; {} required",
            action.actor.role, event.status, eligible.role
        )));
    }
    if eligible.scope == RoleScope::College && action.actor.college_id != Some(event.college_id) {
        return Err(ApprovalError::unauthorized(format!(
            "{} of a different college may not act on event {}",
            eligible.role, event.id
        )));
    }

    let (to, outcome, notify) = match action.decision {
        Decision::Approve => {
            // Reason text on approve is ignored, not an error
            let (to, notify) = match tier {
                Tier::Faculty => (
                    EventStatus::PendingDeanApproval,
                    NotificationDirective::TierApprovers {
                        tier: Tier::Dean,
                        kind: NotificationKind::ApprovalAdvanced,
                    },
                ),
                Tier::Dean => (
                    EventStatus::PendingDeanshipApproval,
                    NotificationDirective::TierApprovers {
                        tier: Tier::Deanship,
                        kind: NotificationKind::ApprovalAdvanced,
                    },
                ),
                Tier::Deanship => (
                    EventStatus::Approved,
                    NotificationDirective::Submitter {
                        kind: NotificationKind::EventApproved,
                    },
                ),
            };
            (to, OutcomeWrite::None, notify)
        }
        Decision::Reject => {
            let reason = require_reason(action, "rejection")?;
            (
                tier.rejected_status(),
                OutcomeWrite::RejectionReason { tier, reason },
                NotificationDirective::Submitter {
                    kind: NotificationKind::EventRejected,
                },
            )
        }
        Decision::RequestRevision => {
            let request = require_reason(action, "revision request")?;
            (
                tier.revision_status(),
                OutcomeWrite::RevisionRequest { tier, request },
                NotificationDirective::Submitter {
                    kind: NotificationKind::RevisionRequested,
                },
            )
        }
        Decision::RespondRevision => unreachable!("routed to plan_revision_response"),
    };

    Ok(TransitionPlan {
        event_id: event.id,
        actor_id: action.actor.user_id,
        from: event.status,
        to,
        outcome,
        notify,
    })
}

fn plan_revision_response(event: &Event, action: &ApprovalAction) -> Result<TransitionPlan> {
    let tier = event.status.revision_tier().ok_or_else(|| {
        ApprovalError::unauthorized(format!(
            "event {} is not waiting on a revision response (status {})",
            event.id, event.status
        ))
    })?;

    let response = require_reason(action, "revision response")?;

    // Back to the SAME tier's pending state; the approver re-evaluates
    // from scratch, the response never auto-approves.
    Ok(TransitionPlan {
        event_id: event.id,
        actor_id: action.actor.user_id,
        from: event.status,
        to: tier.pending_status(),
        outcome: OutcomeWrite::RevisionResponse { tier, response },
        notify: NotificationDirective::TierApprovers {
            tier,
            kind: NotificationKind::RevisionResponded,
        },
    })
}

fn require_reason(action: &ApprovalAction, what: &str) -> Result<String> {
    match action.reason.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ApprovalError::invalid(format!(
            "{what} text is required for {}",
            action.decision
        ))),
    }
}
