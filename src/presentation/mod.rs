//! Presentation Layer
//!
//! HTTP routes exposing the chat RPCs as JSON endpoints.

pub mod http;
pub mod middleware;
