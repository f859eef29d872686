//! # Domain Entities
//!
//! Core domain entities of the chat service. All entities map directly to
//! their corresponding database tables.
//!
//! - **User**: an externally issued identity, referenced by ID
//! - **Room**: a named container of participants (`rooms` + `room_members`)
//! - **Message**: an immutable, ordered unit of content within one room
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access
//! operations. These traits are implemented in the infrastructure layer,
//! following the dependency inversion principle.

mod message;
mod room;
mod user;

pub use message::{
    AppendedMessage, Message, MessageId, MessageRepository, NewMessage, MAX_CONTENT_LENGTH,
};
pub use room::{NewRoom, Room, RoomId, RoomRepository, MAX_ROOM_NAME_LENGTH};
pub use user::{User, UserDirectory, UserId, MAX_USER_ID};

#[cfg(test)]
pub use message::MockMessageRepository;
#[cfg(test)]
pub use room::MockRoomRepository;
#[cfg(test)]
pub use user::MockUserDirectory;
