// Role domain types
//
// Roles are a closed enumeration; the policy resolver is the only place
// that maps a role onto the actions it may take.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::ApprovalError;

/// Actor role within the university
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Faculty Leader of a college (first approval tier)
    FacultyLeader,
    /// Dean of Faculty of a college (second approval tier)
    DeanOfFaculty,
    /// Deanship of Student Affairs (university-wide, final tier)
    Deanship,
    /// Regular student (submitter side; never an approver)
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::FacultyLeader => "FACULTY_LEADER",
            Role::DeanOfFaculty => "DEAN_OF_FACULTY",
            Role::Deanship => "DEANSHIP",
            Role::Student => "STUDENT",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ApprovalError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "FACULTY_LEADER" => Ok(Role::FacultyLeader),
            "DEAN_OF_FACULTY" => Ok(Role::DeanOfFaculty),
            "DEANSHIP" => Ok(Role::Deanship),
            "STUDENT" => Ok(Role::Student),
            other => Err(ApprovalError::invalid(format!("unknown role: {other}"))),
        }
    }
}

/// Scope at which a role acts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleScope {
    /// Bound to the event's college (Faculty Leader, Dean of Faculty)
    College,
    /// One actor pool for the whole university (Deanship)
    UniversityWide,
}

/// A resolved acting user: id plus the role and college the directory
/// reports for them. College is None for university-wide roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
    pub college_id: Option<Uuid>,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Role, college_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            role,
            college_id,
        }
    }
}
