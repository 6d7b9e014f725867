// Event Approval Abstraction
//
// This crate provides a DB-agnostic implementation of the campus event
// approval chain (faculty → dean → deanship) and its notification fan-out.
//
// Key design decisions:
// - Uses traits (EventStore, NotificationStore, Directory) for pluggable backends
// - The state machine plans transitions as pure data (TransitionPlan);
//   backends apply them conditionally on the status being unchanged (CAS)
// - Roles are a closed enum; the policy resolver is the single source of
//   truth for role → action legality
// - Revision rounds are an append-only audit log; the event keeps only the
//   latest round per tier in its snapshot fields
// - Notifications carry a structured payload alongside the rendered message

// Domain entity types
pub mod event;
pub mod notification;
pub mod revision;
pub mod role;

pub mod error;
pub mod machine;
pub mod policy;
pub mod traits;

// In-memory implementations for examples and testing
pub mod memory;

// Re-exports for convenience
pub use error::{ApprovalError, Result};
pub use event::{ApprovalAction, Decision, Event, EventDraft, EventStatus, Tier};
pub use machine::{plan_transition, NotificationDirective, OutcomeWrite, TransitionPlan};
pub use notification::{
    CreateNotification, Notification, NotificationKind, NotificationPayload,
};
pub use policy::{can_respond_to_revision, eligible_actor, EligibleActor};
pub use revision::RevisionRound;
pub use role::{Actor, Role, RoleScope};
pub use traits::{CommunityRef, CreateEvent, Directory, EventStore, NotificationStore};
