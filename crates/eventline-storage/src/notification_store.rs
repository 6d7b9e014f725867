// Database-backed NotificationStore implementation
//
// Notifications are plain rows; the structured payload is stored as JSONB
// next to the rendered message. Read-marking is ownership-scoped in SQL.

use async_trait::async_trait;
use uuid::Uuid;

use eventline_core::{
    ApprovalError, CreateNotification, Notification, NotificationStore, Result,
};

use crate::models::CreateNotificationRow;
use crate::repositories::Database;

/// Database-backed notification store
#[derive(Clone)]
pub struct DbNotificationStore {
    db: Database,
}

impl DbNotificationStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationStore for DbNotificationStore {
    async fn create(&self, input: CreateNotification) -> Result<Notification> {
        let payload = input
            .payload
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        let row = self
            .db
            .create_notification(CreateNotificationRow {
                recipient_id: input.recipient_id,
                kind: input.kind.as_str().to_string(),
                event_id: input.event_id,
                message: input.message,
                payload,
            })
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        Notification::try_from(row)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let rows = self
            .db
            .list_notifications(user_id)
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn unread_count(&self, user_id: Uuid) -> Result<u64> {
        let count = self
            .db
            .count_unread_notifications(user_id)
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))?;

        Ok(count as u64)
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        self.db
            .mark_notification_read(id, user_id)
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        self.db
            .mark_all_notifications_read(user_id)
            .await
            .map_err(|e| ApprovalError::storage(e.to_string()))
    }
}
