//! Response DTOs
//!
//! Defines the peer wire response and the JSON bodies of the HTTP API.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::group::GroupStatsSnapshot;

/// Body returned to a peer: the raw value bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerResponse {
    pub value: Vec<u8>,
}

impl PeerResponse {
    pub fn new(value: Vec<u8>) -> Self {
        Self { value }
    }
}

/// Response body for the frontend lookup (GET /api/:group/:key)
#[derive(Debug, Clone, Serialize)]
pub struct ValueResponse {
    /// The group that was queried
    pub group: String,
    /// The requested key
    pub key: String,
    /// The value, decoded as UTF-8 (lossy)
    pub value: String,
}

impl ValueResponse {
    pub fn new(group: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Statistics of one group
#[derive(Debug, Clone, Serialize)]
pub struct GroupStatsResponse {
    pub name: String,
    pub group: GroupStatsSnapshot,
    pub cache: CacheStats,
    /// Local shard hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl GroupStatsResponse {
    pub fn new(name: impl Into<String>, group: GroupStatsSnapshot, cache: CacheStats) -> Self {
        let hit_rate = cache.hit_rate();
        Self {
            name: name.into(),
            group,
            cache,
            hit_rate,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// This node's peer id
    pub node: String,
    pub groups: Vec<GroupStatsResponse>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_response_serialize() {
        let resp = ValueResponse::new("scores", "Tom", "630");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("scores"));
        assert!(json.contains("Tom"));
        assert!(json.contains("630"));
    }

    #[test]
    fn test_group_stats_hit_rate() {
        let cache = CacheStats {
            hits: 80,
            misses: 20,
            ..CacheStats::default()
        };
        let resp = GroupStatsResponse::new("scores", GroupStatsSnapshot::default(), cache);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
