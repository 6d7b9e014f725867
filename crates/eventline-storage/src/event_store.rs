// Database-backed EventStore implementation
//
// The transition write is a single conditional UPDATE: new status and the
// tier's outcome column go out together, guarded by `status = expected`.
// Zero rows updated means somebody else transitioned first (Conflict) or
// the event is gone (NotFound); a follow-up existence check tells the two
// apart. Revision-round bookkeeping rides in the same transaction.

use async_trait::async_trait;
use uuid::Uuid;

use eventline_core::{
    ApprovalError, CreateEvent, Event, EventStatus, EventStore, OutcomeWrite, Result,
    RevisionRound, Tier, TransitionPlan,
};

use crate::models::{CreateEventRow, EventRow, RevisionRoundRow};
use crate::repositories::Database;

/// Database-backed event store
#[derive(Clone)]
pub struct DbEventStore {
    db: Database,
}

impl DbEventStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventStore for DbEventStore {
    async fn create(&self, input: CreateEvent) -> Result<Event> {
        let row = self
            .db
            .create_event(CreateEventRow {
                title: input.title,
                description: input.description,
                starts_at: input.starts_at,
                ends_at: input.ends_at,
                capacity: input.capacity,
                location: input.location,
                college_id: input.college_id,
                community_id: input.community_id,
                created_by: input.created_by,
                status: input.status.as_str().to_string(),
            })
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        Event::try_from(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>> {
        let row = self
            .db
            .get_event(id)
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        row.map(Event::try_from).transpose()
    }

    async fn apply_transition(&self, plan: &TransitionPlan) -> Result<Event> {
        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        let updated = conditional_update(&mut tx, plan)
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        let row = match updated {
            Some(row) => row,
            None => {
                // Lost the race, or the event never existed
                let exists: Option<Uuid> =
                    sqlx::query_scalar("SELECT id FROM events WHERE id = $1")
                        .bind(plan.event_id)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(|e| ApprovalError::storage(e.to_string()))?;
                return match exists {
                    Some(_) => Err(ApprovalError::conflict(plan.from.as_str())),
                    None => Err(ApprovalError::event_not_found(plan.event_id)),
                };
            }
        };

        match &plan.outcome {
            OutcomeWrite::RevisionRequest { tier, request } => {
                sqlx::query(
                    r#"
                    INSERT INTO event_revision_rounds (event_id, tier, requested_by, request_text)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(plan.event_id)
                .bind(tier.as_str())
                .bind(plan.actor_id)
                .bind(request)
                .execute(&mut *tx)
                .await
                .map_err(|e| ApprovalError::storage(e.to_string()))?;
            }
            OutcomeWrite::RevisionResponse { tier, response } => {
                sqlx::query(
                    r#"
                    UPDATE event_revision_rounds
                    SET responded_by = $1, response_text = $2, responded_at = NOW()
                    WHERE id = (
                        SELECT id FROM event_revision_rounds
                        WHERE event_id = $3 AND tier = $4 AND response_text IS NULL
                        ORDER BY requested_at DESC
                        LIMIT 1
                    )
                    "#,
                )
                .bind(plan.actor_id)
                .bind(response)
                .bind(plan.event_id)
                .bind(tier.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| ApprovalError::storage(e.to_string()))?;
            }
            OutcomeWrite::None | OutcomeWrite::RejectionReason { .. } => {}
        }

        tx.commit()
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        Event::try_from(row)
    }

    async fn list_by_status(
        &self,
        statuses: &[EventStatus],
        college_id: Option<Uuid>,
    ) -> Result<Vec<Event>> {
        let status_strings: Vec<String> =
            statuses.iter().map(|s| s.as_str().to_string()).collect();
        let rows = self
            .db
            .list_events_by_status(&status_strings, college_id)
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn list_revision_rounds(&self, event_id: Uuid) -> Result<Vec<RevisionRound>> {
        let rows: Vec<RevisionRoundRow> = self
            .db
            .list_revision_rounds(event_id)
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        rows.into_iter().map(RevisionRound::try_from).collect()
    }
}

/// The guarded status+outcome write. One static statement per outcome
/// shape and tier; values are always bound, never spliced.
async fn conditional_update(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    plan: &TransitionPlan,
) -> std::result::Result<Option<EventRow>, sqlx::Error> {
    match &plan.outcome {
        OutcomeWrite::None => {
            sqlx::query_as::<_, EventRow>(
                r#"
                UPDATE events SET status = $1, updated_at = NOW()
                WHERE id = $2 AND status = $3
                RETURNING *
                "#,
            )
            .bind(plan.to.as_str())
            .bind(plan.event_id)
            .bind(plan.from.as_str())
            .fetch_optional(&mut **tx)
            .await
        }
        OutcomeWrite::RejectionReason { tier, reason } => {
            let sql = match tier {
                Tier::Faculty => {
                    r#"
                    UPDATE events SET status = $1, faculty_rejection_reason = $2, updated_at = NOW()
                    WHERE id = $3 AND status = $4
                    RETURNING *
                    "#
                }
                Tier::Dean => {
                    r#"
                    UPDATE events SET status = $1, dean_rejection_reason = $2, updated_at = NOW()
                    WHERE id = $3 AND status = $4
                    RETURNING *
                    "#
                }
                Tier::Deanship => {
                    r#"
                    UPDATE events SET status = $1, deanship_rejection_reason = $2, updated_at = NOW()
                    WHERE id = $3 AND status = $4
                    RETURNING *
                    "#
                }
            };
            sqlx::query_as::<_, EventRow>(sql)
                .bind(plan.to.as_str())
                .bind(reason)
                .bind(plan.event_id)
                .bind(plan.from.as_str())
                .fetch_optional(&mut **tx)
                .await
        }
        OutcomeWrite::RevisionRequest { tier, request } => {
            // A fresh round replaces the snapshot pair: response cleared
            let sql = match tier {
                Tier::Faculty => {
                    r#"
                    UPDATE events SET status = $1, faculty_revision_request = $2,
                                      faculty_revision_response = NULL, updated_at = NOW()
                    WHERE id = $3 AND status = $4
                    RETURNING *
                    "#
                }
                Tier::Dean => {
                    r#"
                    UPDATE events SET status = $1, dean_revision_request = $2,
                                      dean_revision_response = NULL, updated_at = NOW()
                    WHERE id = $3 AND status = $4
                    RETURNING *
                    "#
                }
                Tier::Deanship => {
                    r#"
                    UPDATE events SET status = $1, deanship_revision_request = $2,
                                      deanship_revision_response = NULL, updated_at = NOW()
                    WHERE id = $3 AND status = $4
                    RETURNING *
                    "#
                }
            };
            sqlx::query_as::<_, EventRow>(sql)
                .bind(plan.to.as_str())
                .bind(request)
                .bind(plan.event_id)
                .bind(plan.from.as_str())
                .fetch_optional(&mut **tx)
                .await
        }
        OutcomeWrite::RevisionResponse { tier, response } => {
            let sql = match tier {
                Tier::Faculty => {
                    r#"
                    UPDATE events SET status = $1, faculty_revision_response = $2, updated_at = NOW()
                    WHERE id = $3 AND status = $4
                    RETURNING *
                    "#
                }
                Tier::Dean => {
                    r#"
                    UPDATE events SET status = $1, dean_revision_response = $2, updated_at = NOW()
                    WHERE id = $3 AND status = $4
                    RETURNING *
                    "#
                }
                Tier::Deanship => {
                    r#"
                    UPDATE events SET status = $1, deanship_revision_response = $2, updated_at = NOW()
                    WHERE id = $3 AND status = $4
                    RETURNING *
                    "#
                }
            };
            sqlx::query_as::<_, EventRow>(sql)
                .bind(plan.to.as_str())
                .bind(response)
                .bind(plan.event_id)
                .bind(plan.from.as_str())
                .fetch_optional(&mut **tx)
                .await
        }
    }
}
