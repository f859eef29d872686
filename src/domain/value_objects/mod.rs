//! # Value Objects
//!
//! Immutable values computed on read and never persisted.

mod pagination;

pub use pagination::{PageRequest, Pagination};
