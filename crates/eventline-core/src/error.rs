// Error types for the approval core

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for approval operations
pub type Result<T> = std::result::Result<T, ApprovalError>;

/// Errors that can occur while driving the approval chain
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// Malformed input: missing reason text, empty draft fields, etc.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Actor/role does not match what the current status allows
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Optimistic concurrency check failed; the caller must re-read and retry
    #[error("Conflict: event status changed since read (expected {expected})")]
    Conflict { expected: String },

    /// Event, user, or community reference does not resolve
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApprovalError {
    /// Create an invalid-input error
    pub fn invalid(msg: impl Into<String>) -> Self {
        ApprovalError::InvalidInput(msg.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApprovalError::Unauthorized(msg.into())
    }

    /// Create a conflict error for a failed conditional status write
    pub fn conflict(expected: impl Into<String>) -> Self {
        ApprovalError::Conflict {
            expected: expected.into(),
        }
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        ApprovalError::Storage(msg.into())
    }

    /// Create an event-not-found error
    pub fn event_not_found(event_id: Uuid) -> Self {
        ApprovalError::NotFound(format!("event {event_id}"))
    }

    /// Create a user-not-found error
    pub fn user_not_found(user_id: Uuid) -> Self {
        ApprovalError::NotFound(format!("user {user_id}"))
    }
}
