//! User reference and identity lookup trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Externally issued user identifier.
pub type UserId = u64;

/// Largest user ID the stores can key on (signed 64-bit storage).
pub const MAX_USER_ID: UserId = i64::MAX as UserId;

/// A user as seen by the chat service: an ID and a display name.
///
/// Users are owned by the identity system. The chat service keeps a local
/// `chat_users` projection (id, username) fed by `AddRoomParticipant`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }

    /// Whether a display name is known for this user.
    pub fn has_username(&self) -> bool {
        !self.username.trim().is_empty()
    }
}

/// Resolves user IDs to display names.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up the given IDs. Unknown IDs are absent from the result.
    async fn resolve(&self, ids: &[UserId]) -> Result<Vec<User>, AppError>;
}
