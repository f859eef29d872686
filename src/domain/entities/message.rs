//! Message entity and repository trait.
//!
//! Maps to the `messages` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::room::RoomId;
use super::user::UserId;
use crate::shared::error::AppError;

/// Backend-assigned message identifier.
pub type MessageId = u64;

/// Maximum message content length in characters.
pub const MAX_CONTENT_LENGTH: usize = 4000;

/// Represents a message in a room.
///
/// Maps to the `messages` table:
/// - id: BIGSERIAL PRIMARY KEY (allocated inside the insert transaction)
/// - room_id: BIGINT NOT NULL REFERENCES rooms(id)
/// - sender_id: BIGINT NOT NULL
/// - content: TEXT NOT NULL (empty only when attachment_url is set)
/// - attachment_url: TEXT NULL
/// - reply_to: BIGINT NULL REFERENCES messages(id), same room
/// - idempotency_key: TEXT NULL, unique per (room_id, sender_id)
/// - sent_at: TIMESTAMPTZ NOT NULL (strictly increasing per room)
/// - read_at: TIMESTAMPTZ NULL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub content: String,
    pub attachment_url: Option<String>,
    pub reply_to: Option<MessageId>,
    pub sent_at: DateTime<Utc>,
    /// Persisted only; set by read receipts outside this service.
    pub read_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn has_attachment(&self) -> bool {
        self.attachment_url.is_some()
    }
}

/// A message about to be appended. ID and `sent_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub content: String,
    pub attachment_url: Option<String>,
    pub reply_to: Option<MessageId>,
    pub idempotency_key: Option<String>,
}

impl NewMessage {
    /// A message needs text or an attachment.
    pub fn has_body(&self) -> bool {
        !self.content.is_empty() || self.attachment_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Result of an append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendedMessage {
    pub message: Message,
    /// `true` when an earlier message with the same idempotency key was returned
    pub replayed: bool,
}

/// Repository trait for Message data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find a message by ID.
    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, AppError>;

    /// Allocate the next ID and send time for the room and insert the message,
    /// atomically. Concurrent appends to one room are serialised by the store.
    ///
    /// If the message carries an idempotency key already used by the same
    /// sender in the room, the stored message is returned instead.
    async fn append(&self, message: &NewMessage) -> Result<AppendedMessage, AppError>;

    /// Count all messages ever sent to a room.
    async fn count_by_room(&self, room_id: RoomId) -> Result<u64, AppError>;

    /// A page of messages in ascending ID order.
    async fn find_page(
        &self,
        room_id: RoomId,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Message>, AppError>;
}
