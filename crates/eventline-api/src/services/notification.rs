// Notification read-side service

use std::sync::Arc;
use uuid::Uuid;

use eventline_core::{ApprovalError, Notification, NotificationStore, Result};

pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        self.store.list_for_user(user_id).await
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<u64> {
        self.store.unread_count(user_id).await
    }

    /// Mark one notification read; NotFound covers both a missing record
    /// and one owned by a different recipient.
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        if self.store.mark_read(id, user_id).await? {
            Ok(())
        } else {
            Err(ApprovalError::NotFound(format!("notification {id}")))
        }
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        self.store.mark_all_read(user_id).await
    }
}
