//! Data Transfer Objects
//!
//! DTOs for RPC request/response serialization.

pub mod request;
pub mod response;

pub use request::{
    AddRoomParticipantRequest, CreateRoomRequest, GetMessagesRequest, GetRoomRequest,
    SaveMessageRequest,
};
pub use response::{
    CreateRoomResponse, MessageResponse, PaginatedMessagesResponse, PaginationResponse,
    RoomParticipantsResponse, SaveMessageResponse, UserResponse,
};
