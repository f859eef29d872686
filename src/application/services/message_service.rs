//! Message Service
//!
//! The message store: validates and appends messages, and serves paged
//! room history in send order.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::PaginationSettings;
use crate::domain::{
    AppendedMessage, DomainError, Message, MessageId, MessageRepository, NewMessage, PageRequest,
    Pagination, Room, RoomId, RoomRepository, UserId, MAX_CONTENT_LENGTH,
};

/// Message service trait
#[async_trait]
pub trait MessageService: Send + Sync {
    /// Save a message to a room
    async fn save_message(&self, request: SaveMessageDto) -> Result<AppendedMessage, DomainError>;

    /// Get one page of a room's history, oldest first
    async fn get_messages(
        &self,
        room_id: RoomId,
        page: u32,
        limit: u32,
    ) -> Result<MessagePage, DomainError>;
}

/// Save message request
#[derive(Debug, Clone, Default)]
pub struct SaveMessageDto {
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub content: String,
    pub attachment_url: Option<String>,
    pub reply_to: Option<MessageId>,
    pub idempotency_key: Option<String>,
}

/// One page of a room's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePage {
    pub room: Room,
    pub messages: Vec<Message>,
    pub pagination: Pagination,
}

/// MessageService implementation
pub struct MessageServiceImpl<M, R>
where
    M: MessageRepository,
    R: RoomRepository,
{
    message_repo: Arc<M>,
    room_repo: Arc<R>,
    paging: PaginationSettings,
}

impl<M, R> MessageServiceImpl<M, R>
where
    M: MessageRepository,
    R: RoomRepository,
{
    pub fn new(message_repo: Arc<M>, room_repo: Arc<R>, paging: PaginationSettings) -> Self {
        Self {
            message_repo,
            room_repo,
            paging,
        }
    }

    async fn find_room(&self, room_id: RoomId) -> Result<Room, DomainError> {
        self.room_repo
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| DomainError::room_not_found(room_id))
    }

    /// Reply targets must already exist in the same room.
    async fn check_reply_target(&self, room_id: RoomId, reply_to: MessageId) -> Result<(), DomainError> {
        let target = self
            .message_repo
            .find_by_id(reply_to)
            .await?
            .ok_or_else(|| {
                DomainError::InvalidArgument(format!("Reply target {} does not exist", reply_to))
            })?;

        if target.room_id != room_id {
            return Err(DomainError::InvalidArgument(format!(
                "Reply target {} belongs to another room",
                reply_to
            )));
        }

        Ok(())
    }
}

/// Treat empty optional strings as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl<M, R> MessageService for MessageServiceImpl<M, R>
where
    M: MessageRepository + 'static,
    R: RoomRepository + 'static,
{
    async fn save_message(&self, request: SaveMessageDto) -> Result<AppendedMessage, DomainError> {
        let message = NewMessage {
            room_id: request.room_id,
            sender_id: request.sender_id,
            content: request.content,
            attachment_url: non_empty(request.attachment_url),
            reply_to: request.reply_to.filter(|id| *id != 0),
            idempotency_key: non_empty(request.idempotency_key),
        };

        if !message.has_body() {
            return Err(DomainError::InvalidArgument(
                "Message needs content or an attachment".into(),
            ));
        }
        if message.content.chars().count() > MAX_CONTENT_LENGTH {
            return Err(DomainError::InvalidArgument(format!(
                "Message content must be at most {} characters",
                MAX_CONTENT_LENGTH
            )));
        }

        // Rooms and memberships are never removed and messages are immutable,
        // so these checks stay valid until the append commits.
        self.find_room(message.room_id).await?;

        if !self
            .room_repo
            .is_member(message.room_id, message.sender_id)
            .await?
        {
            return Err(DomainError::PermissionDenied(format!(
                "User {} is not a member of room {}",
                message.sender_id, message.room_id
            )));
        }

        if let Some(reply_to) = message.reply_to {
            self.check_reply_target(message.room_id, reply_to).await?;
        }

        let appended = self.message_repo.append(&message).await?;

        if appended.replayed {
            tracing::debug!(
                room_id = message.room_id,
                message_id = appended.message.id,
                "Idempotent save replayed"
            );
        } else {
            tracing::info!(
                room_id = message.room_id,
                message_id = appended.message.id,
                sender_id = message.sender_id,
                "Message saved"
            );
        }

        Ok(appended)
    }

    async fn get_messages(
        &self,
        room_id: RoomId,
        page: u32,
        limit: u32,
    ) -> Result<MessagePage, DomainError> {
        let room = self.find_room(room_id).await?;

        let request = PageRequest::new(
            page,
            limit,
            self.paging.default_page_size,
            self.paging.max_page_size,
        );
        let total_items = self.message_repo.count_by_room(room_id).await?;
        let pagination = Pagination::compute(request, total_items);

        let messages = if pagination.is_out_of_range() {
            Vec::new()
        } else {
            self.message_repo
                .find_page(room_id, request.offset(), request.limit())
                .await?
        };

        Ok(MessagePage {
            room,
            messages,
            pagination,
        })
    }
}
