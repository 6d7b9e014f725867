// Database-backed Directory implementation
//
// Read-only reference data: users with their role/college binding,
// communities with their designated leader, and the per-tier approver
// lookup. Never written by this subsystem.

use async_trait::async_trait;
use uuid::Uuid;

use eventline_core::{
    Actor, ApprovalError, CommunityRef, Directory, Result, Role, Tier,
};

use crate::repositories::Database;

/// Database-backed user/community directory
#[derive(Clone)]
pub struct DbDirectory {
    db: Database,
}

impl DbDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Directory for DbDirectory {
    async fn resolve_actor(&self, user_id: Uuid) -> Result<Option<Actor>> {
        let row = self
            .db
            .get_user(user_id)
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        row.map(|row| {
            let role = Role::try_from(row.role.as_str())
                .map_err(|_| ApprovalError::storage(format!("corrupt role: {}", row.role)))?;
            Ok(Actor::new(row.id, role, row.college_id))
        })
        .transpose()
    }

    async fn display_name(&self, user_id: Uuid) -> Result<Option<String>> {
        let row = self
            .db
            .get_user(user_id)
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        Ok(row.map(|row| row.name))
    }

    async fn community(&self, community_id: Uuid) -> Result<Option<CommunityRef>> {
        let row = self
            .db
            .get_community(community_id)
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        Ok(row.map(|row| CommunityRef {
            id: row.id,
            college_id: row.college_id,
            leader_id: row.leader_id,
        }))
    }

    async fn tier_recipients(&self, tier: Tier, college_id: Uuid) -> Result<Vec<Uuid>> {
        let (role, college) = match tier {
            Tier::Faculty => (Role::FacultyLeader, Some(college_id)),
            Tier::Dean => (Role::DeanOfFaculty, Some(college_id)),
            // University-wide pool, college ignored
            Tier::Deanship => (Role::Deanship, None),
        };

        let rows = self
            .db
            .list_users_by_role(role.as_str(), college)
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.id).collect())
    }
}
