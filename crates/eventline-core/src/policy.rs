// Approval policy resolver
//
// Pure functions: who may act on an event in its current status. Both the
// state machine (to authorize) and external callers (to decide whether to
// render an action control) go through here; no role matching lives
// anywhere else.

use uuid::Uuid;

use crate::event::{Event, EventStatus};
use crate::role::{Role, RoleScope};

/// The role allowed to decide next, and the scope it must hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibleActor {
    pub role: Role,
    pub scope: RoleScope,
}

/// Resolve which approver role may act on an event in `status`.
///
/// None for revision-wait states (only the submitter may act there, via
/// [`can_respond_to_revision`]) and for terminal states (nobody may act).
pub fn eligible_actor(status: EventStatus) -> Option<EligibleActor> {
    match status {
        EventStatus::PendingFacultyApproval => Some(EligibleActor {
            role: Role::FacultyLeader,
            scope: RoleScope::College,
        }),
        EventStatus::PendingDeanApproval => Some(EligibleActor {
            role: Role::DeanOfFaculty,
            scope: RoleScope::College,
        }),
        EventStatus::PendingDeanshipApproval => Some(EligibleActor {
            role: Role::Deanship,
            scope: RoleScope::UniversityWide,
        }),
        EventStatus::FacultyRequiresRevision
        | EventStatus::DeanRequiresRevision
        | EventStatus::DeanshipRequiresRevision
        | EventStatus::Approved
        | EventStatus::FacultyRejected
        | EventStatus::DeanRejected
        | EventStatus::DeanshipRejected => None,
    }
}

/// True only if `acting_user` is the event's creator or the leader of its
/// owning community, and the event is waiting on a revision response.
pub fn can_respond_to_revision(
    acting_user: Uuid,
    event: &Event,
    community_leader: Option<Uuid>,
) -> bool {
    if event.status.revision_tier().is_none() {
        return false;
    }
    acting_user == event.created_by || community_leader == Some(acting_user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_event(created_by: Uuid, status: EventStatus) -> Event {
        Event {
            id: Uuid::now_v7(),
            title: "Robotics Night".into(),
            description: "Demos and workshops".into(),
            starts_at: Utc::now(),
            ends_at: None,
            capacity: Some(80),
            location: "Main Hall".into(),
            college_id: Uuid::now_v7(),
            community_id: Uuid::now_v7(),
            created_by,
            status,
            faculty_rejection_reason: None,
            dean_rejection_reason: None,
            deanship_rejection_reason: None,
            faculty_revision_request: None,
            dean_revision_request: None,
            deanship_revision_request: None,
            faculty_revision_response: None,
            dean_revision_response: None,
            deanship_revision_response: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn pending_states_map_to_tier_roles() {
        let faculty = eligible_actor(EventStatus::PendingFacultyApproval).unwrap();
        assert_eq!(faculty.role, Role::FacultyLeader);
        assert_eq!(faculty.scope, RoleScope::College);

        let dean = eligible_actor(EventStatus::PendingDeanApproval).unwrap();
        assert_eq!(dean.role, Role::DeanOfFaculty);
        assert_eq!(dean.scope, RoleScope::College);

        let deanship = eligible_actor(EventStatus::PendingDeanshipApproval).unwrap();
        assert_eq!(deanship.role, Role::Deanship);
        assert_eq!(deanship.scope, RoleScope::UniversityWide);
    }

    #[test]
    fn terminal_and_revision_states_have_no_eligible_approver() {
        for status in [
            EventStatus::Approved,
            EventStatus::FacultyRejected,
            EventStatus::DeanRejected,
            EventStatus::DeanshipRejected,
            EventStatus::FacultyRequiresRevision,
            EventStatus::DeanRequiresRevision,
            EventStatus::DeanshipRequiresRevision,
        ] {
            assert!(eligible_actor(status).is_none(), "{status}");
        }
    }

    #[test]
    fn creator_may_respond_to_revision() {
        let creator = Uuid::now_v7();
        let event = sample_event(creator, EventStatus::DeanRequiresRevision);
        assert!(can_respond_to_revision(creator, &event, None));
    }

    #[test]
    fn community_leader_may_respond_to_revision() {
        let leader = Uuid::now_v7();
        let event = sample_event(Uuid::now_v7(), EventStatus::FacultyRequiresRevision);
        assert!(can_respond_to_revision(leader, &event, Some(leader)));
    }

    #[test]
    fn stranger_may_not_respond() {
        let event = sample_event(Uuid::now_v7(), EventStatus::FacultyRequiresRevision);
        assert!(!can_respond_to_revision(
            Uuid::now_v7(),
            &event,
            Some(Uuid::now_v7())
        ));
    }

    #[test]
    fn nobody_responds_outside_revision_states() {
        let creator = Uuid::now_v7();
        let event = sample_event(creator, EventStatus::PendingDeanApproval);
        assert!(!can_respond_to_revision(creator, &event, None));
    }
}
