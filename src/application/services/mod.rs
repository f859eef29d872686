//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **RoomService**: Room directory and membership
//! - **MessageService**: Message appends and paged history
//! - **ChatService**: RPC façade over both

pub mod chat_service;
pub mod message_service;
pub mod room_service;

// Re-export façade
pub use chat_service::ChatService;

// Re-export room service types
pub use room_service::{RoomService, RoomServiceImpl, RoomView};

// Re-export message service types
pub use message_service::{MessagePage, MessageService, MessageServiceImpl, SaveMessageDto};
