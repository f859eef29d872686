//! Response DTOs
//!
//! Data structures for RPC response bodies.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::application::services::{MessagePage, RoomView};
use crate::domain::{Message, Pagination, Room, User};

/// SaveMessage response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SaveMessageResponse {
    pub message_id: u64,
}

/// User response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: u64,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
        }
    }
}

/// Message response
///
/// Unset optional fields use proto3 zero values: empty strings and 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message_id: u64,
    pub sender_id: u64,
    pub content: String,
    pub attachment_url: String,
    pub reply_to: u64,
    pub sent_at: String,
    pub read_at: String,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            message_id: message.id,
            sender_id: message.sender_id,
            content: message.content,
            attachment_url: message.attachment_url.unwrap_or_default(),
            reply_to: message.reply_to.unwrap_or_default(),
            sent_at: message.sent_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            read_at: message
                .read_at
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Micros, true))
                .unwrap_or_default(),
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse {
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub total_items: u64,
}

impl From<Pagination> for PaginationResponse {
    fn from(p: Pagination) -> Self {
        Self {
            page: p.page,
            limit: p.limit,
            total_pages: p.total_pages,
            total_items: p.total_items,
        }
    }
}

/// GetRoomParticipants / AddRoomParticipant response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomParticipantsResponse {
    pub room_id: u64,
    pub room_name: String,
    pub users: Vec<UserResponse>,
}

impl From<RoomView> for RoomParticipantsResponse {
    fn from(view: RoomView) -> Self {
        Self {
            room_id: view.room.id,
            room_name: view.room.name,
            users: view.participants.into_iter().map(UserResponse::from).collect(),
        }
    }
}

/// CreateRoom response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub room_id: u64,
    pub room_name: String,
}

impl From<Room> for CreateRoomResponse {
    fn from(room: Room) -> Self {
        Self {
            room_id: room.id,
            room_name: room.name,
        }
    }
}

/// GetRoomMessages response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedMessagesResponse {
    pub room_id: u64,
    pub room_name: String,
    pub messages: Vec<MessageResponse>,
    pub pagination: PaginationResponse,
}

impl From<MessagePage> for PaginatedMessagesResponse {
    fn from(page: MessagePage) -> Self {
        Self {
            room_id: page.room.id,
            room_name: page.room.name,
            messages: page.messages.into_iter().map(MessageResponse::from).collect(),
            pagination: page.pagination.into(),
        }
    }
}
