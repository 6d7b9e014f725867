// Postgres storage layer with sqlx
//
// This crate provides database implementations for core traits:
// - DbEventStore: implements EventStore with a conditional status UPDATE (CAS)
// - DbNotificationStore: implements NotificationStore
// - DbDirectory: implements Directory over the users/communities tables

pub mod directory;
pub mod event_store;
pub mod models;
pub mod notification_store;
pub mod repositories;

pub use directory::DbDirectory;
pub use event_store::DbEventStore;
pub use models::*;
pub use notification_store::DbNotificationStore;
pub use repositories::*;
