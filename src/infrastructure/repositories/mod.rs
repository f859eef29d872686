//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! ## Available Repositories
//!
//! - **RoomRepository** - Rooms and membership rows
//! - **MessageRepository** - Serialised appends and paged history
//! - **UserDirectory** - Display names from the `chat_users` projection
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::{
//!     PgMessageRepository, PgRoomRepository, PgUserDirectory,
//! };
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let room_repo = PgRoomRepository::new(pool.clone());
//!     let message_repo = PgMessageRepository::new(pool.clone());
//!     let users = PgUserDirectory::new(pool);
//! }
//! ```

pub mod message_repository;
pub mod room_repository;
pub mod user_repository;

pub use message_repository::PgMessageRepository;
pub use room_repository::PgRoomRepository;
pub use user_repository::PgUserDirectory;
