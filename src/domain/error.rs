//! Domain failure taxonomy.

use crate::shared::error::AppError;

/// Failures reported by the room directory and the message store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Malformed or missing fields, or a violated message invariant
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Referenced room or message is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Sender is not a member of the room
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Backend unavailable or transaction aborted
    #[error("Dependency failure: {0}")]
    DependencyFailure(String),
}

impl DomainError {
    pub fn room_not_found(room_id: u64) -> Self {
        Self::NotFound(format!("Room {} not found", room_id))
    }
}

impl From<AppError> for DomainError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(msg) => Self::NotFound(msg),
            other => Self::DependencyFailure(other.to_string()),
        }
    }
}
