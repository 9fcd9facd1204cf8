//! Error types for the peer cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the peer cache.
///
/// Errors are `Clone` because a single load outcome is handed to every
/// caller that joined the same in-flight request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Group not registered, or nothing to route to
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request (bad path, empty key)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Peer unreachable, non-success status or undecodable peer response
    #[error("Remote fetch failed: {0}")]
    RemoteFetch(String),

    /// The source of truth failed to produce a value
    #[error("Loader failed: {0}")]
    Loader(String),

    /// Wire payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A group with this name is already registered
    #[error("Group already exists: {0}")]
    GroupExists(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::GroupExists(_) => StatusCode::CONFLICT,
            CacheError::RemoteFetch(_) => StatusCode::BAD_GATEWAY,
            CacheError::Loader(_) | CacheError::Serialization(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<bincode::Error> for CacheError {
    fn from(err: bincode::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the peer cache.
pub type Result<T> = std::result::Result<T, CacheError>;
