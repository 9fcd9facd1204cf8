//! Request and Response models
//!
//! This module defines the DTOs exchanged between peers and returned by the
//! HTTP API.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::PeerRequest;
pub use responses::{
    ErrorResponse, GroupStatsResponse, HealthResponse, PeerResponse, StatsResponse, ValueResponse,
};
