//! Custom Extractors
//!
//! Wrappers around axum's JSON, query and path extractors whose rejections
//! are reported as `invalid-argument` RPC errors instead of plain-text bodies.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query};

use crate::shared::error::RpcError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(RpcError))]
pub struct RpcJson<T>(pub T);

/// URL query string
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(RpcError))]
pub struct RpcQuery<T>(pub T);

/// URL path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(RpcError))]
pub struct RpcPath<T>(pub T);

impl From<JsonRejection> for RpcError {
    fn from(rejection: JsonRejection) -> Self {
        RpcError::invalid_argument(rejection.body_text())
    }
}

impl From<QueryRejection> for RpcError {
    fn from(rejection: QueryRejection) -> Self {
        RpcError::invalid_argument(rejection.body_text())
    }
}

impl From<PathRejection> for RpcError {
    fn from(rejection: PathRejection) -> Self {
        RpcError::invalid_argument(rejection.body_text())
    }
}
