//! # Domain Layer
//!
//! The domain layer contains the core business rules of the chat service.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Users, rooms and messages, plus the repository traits the
//!   storage backends implement
//! - **value_objects**: Immutable computed values (pagination)
//! - **error**: The failure taxonomy shared by the room and message services
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Relationships are ID references (membership, reply-to), never embedded graphs
//! - Repository traits define data access contracts

pub mod entities;
pub mod error;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use error::DomainError;
pub use value_objects::*;
