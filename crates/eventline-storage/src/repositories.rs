// Repository layer for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run pending SQL migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEventRow) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (title, description, starts_at, ends_at, capacity, location, college_id, community_id, created_by, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(input.capacity)
        .bind(&input.location)
        .bind(input.college_id)
        .bind(input.community_id)
        .bind(input.created_by)
        .bind(&input.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn list_events_by_status(
        &self,
        statuses: &[String],
        college_id: Option<Uuid>,
    ) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT * FROM events
            WHERE status = ANY($1)
              AND ($2::uuid IS NULL OR college_id = $2)
            ORDER BY created_at ASC
            "#,
        )
        .bind(statuses)
        .bind(college_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Revision rounds (append-only audit log)
    // ============================================

    pub async fn list_revision_rounds(&self, event_id: Uuid) -> Result<Vec<RevisionRoundRow>> {
        let rows = sqlx::query_as::<_, RevisionRoundRow>(
            r#"
            SELECT * FROM event_revision_rounds
            WHERE event_id = $1
            ORDER BY requested_at ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Notifications
    // ============================================

    pub async fn create_notification(
        &self,
        input: CreateNotificationRow,
    ) -> Result<NotificationRow> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (recipient_id, kind, event_id, message, payload, read)
            VALUES ($1, $2, $3, $4, $5, FALSE)
            RETURNING *
            "#,
        )
        .bind(input.recipient_id)
        .bind(&input.kind)
        .bind(input.event_id)
        .bind(&input.message)
        .bind(&input.payload)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_notifications(&self, recipient_id: Uuid) -> Result<Vec<NotificationRow>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT * FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_unread_notifications(&self, recipient_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND read = FALSE",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn mark_notification_read(&self, id: Uuid, recipient_id: Uuid) -> Result<bool> {
        // Ownership enforced in the WHERE clause, not by a prior read
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE id = $1 AND recipient_id = $2",
        )
        .bind(id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_all_notifications_read(&self, recipient_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE recipient_id = $1 AND read = FALSE",
        )
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // ============================================
    // Directory (users, communities, colleges)
    // ============================================

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn get_community(&self, id: Uuid) -> Result<Option<CommunityRow>> {
        let row = sqlx::query_as::<_, CommunityRow>("SELECT * FROM communities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn get_college(&self, id: Uuid) -> Result<Option<CollegeRow>> {
        let row = sqlx::query_as::<_, CollegeRow>("SELECT * FROM colleges WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Users holding `role` scoped to `college_id` (NULL college for
    /// university-wide roles)
    pub async fn list_users_by_role(
        &self,
        role: &str,
        college_id: Option<Uuid>,
    ) -> Result<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT * FROM users
            WHERE role = $1
              AND ($2::uuid IS NULL OR college_id = $2)
            ORDER BY created_at ASC
            "#,
        )
        .bind(role)
        .bind(college_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
