//! Request DTOs
//!
//! Defines the request exchanged between peers.

use serde::{Deserialize, Serialize};

/// A peer's request for one key of one group.
///
/// Carried in the request path as `<base>/<group>/<key>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRequest {
    /// Group (namespace) name
    pub group: String,
    /// Cache key
    pub key: String,
}

impl PeerRequest {
    pub fn new(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
        }
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.group.is_empty() {
            return Some("Group cannot be empty".to_string());
        }
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        None
    }
}
