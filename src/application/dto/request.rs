//! Request DTOs
//!
//! Wire shapes of the five chat RPCs. Zero-valued IDs mean "unset" and are
//! rejected here.

use serde::Deserialize;
use validator::Validate;

/// SaveMessage request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveMessageRequest {
    #[validate(range(min = 1, message = "roomId is required"))]
    pub room_id: u64,

    #[validate(range(min = 1, message = "senderId is required"))]
    pub sender_id: u64,

    pub content: String,

    /// Empty means no attachment
    pub attachment_url: String,

    /// 0 means not a reply
    pub reply_to: u64,

    /// Client-chosen key making retries of the same save safe
    pub idempotency_key: Option<String>,
}

/// GetRoomParticipants request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct GetRoomRequest {
    #[validate(range(min = 1, message = "roomId is required"))]
    pub room_id: u64,
}

/// GetRoomMessages request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct GetMessagesRequest {
    #[validate(range(min = 1, message = "roomId is required"))]
    pub room_id: u64,

    /// 0 selects the default page size
    pub limit: u32,

    /// 1-based, 0 selects the first page
    pub page: u32,
}

/// CreateRoom request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, message = "roomName is required"))]
    pub room_name: String,

    #[validate(length(min = 1, message = "userIds must not be empty"))]
    pub user_ids: Vec<u64>,
}

/// AddRoomParticipant request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct AddRoomParticipantRequest {
    #[validate(range(min = 1, message = "roomId is required"))]
    pub room_id: u64,

    #[validate(range(min = 1, message = "userId is required"))]
    pub user_id: u64,

    pub username: String,
}
