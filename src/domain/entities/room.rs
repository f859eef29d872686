//! Room entity and repository trait.
//!
//! Maps to the `rooms` and `room_members` tables.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::{User, UserId};
use crate::shared::error::AppError;

/// Backend-assigned room identifier.
pub type RoomId = u64;

/// Maximum room name length in characters.
pub const MAX_ROOM_NAME_LENGTH: usize = 100;

/// Represents a chat room.
///
/// Maps to the `rooms` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - name: TEXT NOT NULL (non-empty, may repeat across rooms)
/// - last_message_at: TIMESTAMPTZ NULL (send-time watermark)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// Membership lives in `room_members` keyed by (room_id, user_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A room to be created together with its initial members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    pub name: String,
    /// Deduplicated, ascending
    pub member_ids: Vec<UserId>,
}

impl NewRoom {
    pub fn new(name: impl Into<String>, member_ids: impl IntoIterator<Item = UserId>) -> Self {
        let member_ids: BTreeSet<UserId> = member_ids.into_iter().collect();
        Self {
            name: name.into(),
            member_ids: member_ids.into_iter().collect(),
        }
    }
}

/// Repository trait for room and membership data access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find a room by ID.
    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, AppError>;

    /// Create the room and all of its memberships in one transaction.
    async fn create_with_members(&self, room: &NewRoom) -> Result<Room, AppError>;

    /// Add a member. Returns `false` when the user already belonged to the room.
    ///
    /// A non-empty username is recorded in the local user directory within the
    /// same transaction.
    async fn add_member(&self, room_id: RoomId, user: &User) -> Result<bool, AppError>;

    /// Check if a user is a member of a room.
    async fn is_member(&self, room_id: RoomId, user_id: UserId) -> Result<bool, AppError>;

    /// All member IDs of a room, in join order.
    async fn member_ids(&self, room_id: RoomId) -> Result<Vec<UserId>, AppError>;
}
