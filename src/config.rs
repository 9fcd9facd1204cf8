//! Configuration Module
//!
//! Handles loading node configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::peers::{
    normalize_base_path, normalize_peer, PoolOptions, WireCodec, DEFAULT_BASE_PATH, DEFAULT_REPLICAS,
};

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// This node's peer id (base URL other peers use to reach it)
    pub self_url: String,
    /// Static peer list, including this node
    pub peers: Vec<String>,
    /// HTTP server port
    pub server_port: u16,
    /// Byte budget of each group's local shard, 0 = unbounded
    pub cache_bytes: usize,
    /// Prefix of the peer protocol routes
    pub base_path: String,
    /// Virtual nodes per peer on the hash ring
    pub replicas: usize,
    /// Timeout of a single peer request in milliseconds
    pub peer_timeout_ms: u64,
    /// Peer wire encoding
    pub codec: WireCodec,
    /// Name of the group served by the binary
    pub group_name: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SELF_URL` - This node's peer id (default: http://127.0.0.1:8001)
    /// - `PEERS` - Comma-separated peer URLs (default: SELF_URL only)
    /// - `SERVER_PORT` - HTTP server port (default: 8001)
    /// - `CACHE_BYTES` - Shard byte budget (default: 1048576)
    /// - `BASE_PATH` - Peer route prefix (default: /_peercache)
    /// - `REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `PEER_TIMEOUT_MS` - Peer request timeout (default: 3000)
    /// - `CODEC` - `bincode` or `json` (default: bincode)
    /// - `GROUP_NAME` - Group served by the binary (default: scores)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let self_url = env::var("SELF_URL")
            .map(|v| normalize_peer(&v))
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.self_url);
        let peers = env::var("PEERS")
            .ok()
            .map(|v| parse_peers(&v))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| vec![self_url.clone()]);

        Self {
            self_url,
            peers,
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cache_bytes: env::var("CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_bytes),
            base_path: env::var("BASE_PATH")
                .map(|v| normalize_base_path(&v))
                .unwrap_or(defaults.base_path),
            replicas: env::var("REPLICAS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.replicas),
            peer_timeout_ms: env::var("PEER_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.peer_timeout_ms),
            codec: env::var("CODEC")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.codec),
            group_name: env::var("GROUP_NAME").unwrap_or(defaults.group_name),
        }
    }

    /// Peer pool options derived from this configuration.
    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            base_path: self.base_path.clone(),
            replicas: self.replicas,
            codec: self.codec,
            timeout: Duration::from_millis(self.peer_timeout_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let self_url = "http://127.0.0.1:8001".to_string();
        Self {
            peers: vec![self_url.clone()],
            self_url,
            server_port: 8001,
            cache_bytes: 1 << 20,
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            peer_timeout_ms: 3000,
            codec: WireCodec::Bincode,
            group_name: "scores".to_string(),
        }
    }
}

/// Splits a comma-separated peer list, dropping blanks and trailing slashes.
fn parse_peers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(normalize_peer)
        .filter(|p| !p.is_empty())
        .collect()
}
