//! HTTP Peer Pool
//!
//! Owns the consistent hash ring and one [`HttpGetter`] per configured peer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::peers::{HttpGetter, PeerGetter, PeerPicker, WireCodec};
use crate::ring::HashRing;

/// Path prefix shared by all peers for peer-to-peer requests.
pub const DEFAULT_BASE_PATH: &str = "/_peercache";

/// Virtual nodes per peer on the ring.
pub const DEFAULT_REPLICAS: usize = 50;

// == Pool Options ==
/// Tunables of an [`HttpPool`].
#[derive(Debug, Clone)]
pub struct PoolOptions {
    pub base_path: String,
    pub replicas: usize,
    pub codec: WireCodec,
    /// Upper bound on a single peer request
    pub timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            codec: WireCodec::default(),
            timeout: Duration::from_secs(3),
        }
    }
}

// == Normalization ==
/// Canonical form of a peer id: trimmed, without trailing slashes.
///
/// Peer ids are compared as strings, so this process's id and the peer list
/// must be spelled the same way.
pub fn normalize_peer(peer: &str) -> String {
    peer.trim().trim_end_matches('/').to_string()
}

/// Canonical form of a route prefix: one leading `/`, no trailing `/`.
/// Blank prefixes fall back to [`DEFAULT_BASE_PATH`].
pub fn normalize_base_path(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BASE_PATH.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[derive(Debug)]
struct PoolState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

// == HTTP Pool ==
/// Peer picker over a static list of HTTP peers.
#[derive(Debug)]
pub struct HttpPool {
    /// This process's own peer id, e.g. `http://10.0.0.1:8001`
    self_id: String,
    options: PoolOptions,
    client: reqwest::Client,
    state: RwLock<PoolState>,
}

impl HttpPool {
    // == Constructor ==
    /// Creates a pool with no peers; every key is then loaded locally.
    pub fn new(self_id: impl AsRef<str>, mut options: PoolOptions) -> Self {
        options.base_path = normalize_base_path(&options.base_path);
        let state = PoolState {
            ring: HashRing::new(options.replicas, None),
            getters: HashMap::new(),
        };
        Self {
            self_id: normalize_peer(self_id.as_ref()),
            options,
            client: reqwest::Client::new(),
            state: RwLock::new(state),
        }
    }

    pub fn self_id(&self) -> &str {
        &self.self_id
    }

    pub fn options(&self) -> &PoolOptions {
        &self.options
    }

    // == Set Peers ==
    /// Replaces the peer list, rebuilding the ring and all peer handles.
    ///
    /// The list should include this process's own id so that it owns its
    /// share of the keys. Ids are normalized with [`normalize_peer`].
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers: Vec<String> = peers
            .into_iter()
            .map(|p| normalize_peer(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();

        let mut ring = HashRing::new(self.options.replicas, None);
        ring.add(&peers);

        let getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::new(
                    peer.clone(),
                    self.options.base_path.clone(),
                    self.options.codec,
                    self.options.timeout,
                    self.client.clone(),
                );
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        *self.state.write() = PoolState { ring, getters };
        info!(node = %self.self_id, peers = ?peers, "peer set configured");
    }

    /// Returns the configured peer ids, sorted.
    pub fn peers(&self) -> Vec<String> {
        let mut peers: Vec<String> = self.state.read().getters.keys().cloned().collect();
        peers.sort();
        peers
    }

    /// Returns the peer id owning `key`, which may be this process.
    pub fn owner_of(&self, key: &str) -> Option<String> {
        self.state.read().ring.get(key).map(str::to_string)
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.read();
        let peer = state.ring.get(key)?;
        if peer == self.self_id {
            return None;
        }
        debug!(node = %self.self_id, peer, key, "pick peer");
        state
            .getters
            .get(peer)
            .map(|getter| getter.clone() as Arc<dyn PeerGetter>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELF: &str = "http://127.0.0.1:8001";

    fn pool() -> HttpPool {
        HttpPool::new(SELF, PoolOptions::default())
    }

    #[test]
    fn test_no_peers_picks_nothing() {
        let pool = pool();
        assert!(pool.pick_peer("Tom").is_none());
        assert!(pool.peers().is_empty());
    }

    #[test]
    fn test_only_self_picks_nothing() {
        let pool = pool();
        pool.set_peers([SELF]);
        for i in 0..100 {
            assert!(pool.pick_peer(&format!("key{}", i)).is_none());
        }
    }

    #[test]
    fn test_pick_peer_excludes_self() {
        let pool = pool();
        pool.set_peers([SELF, "http://127.0.0.1:8002", "http://127.0.0.1:8003"]);

        let mut remote = 0;
        for i in 0..300 {
            let key = format!("key{}", i);
            let owner = pool.owner_of(&key).unwrap();
            match pool.pick_peer(&key) {
                Some(getter) => {
                    assert_ne!(owner, SELF);
                    assert_eq!(getter.peer(), owner);
                    remote += 1;
                }
                None => assert_eq!(owner, SELF),
            }
        }
        assert!(remote > 0);
        assert!(remote < 300);
    }

    #[test]
    fn test_set_peers_replaces_previous_set() {
        let pool = pool();
        pool.set_peers(["http://a:1", "http://b:2"]);
        pool.set_peers(["http://c:3"]);

        assert_eq!(pool.peers(), vec!["http://c:3"]);
        assert_eq!(pool.owner_of("any").as_deref(), Some("http://c:3"));
    }

    #[test]
    fn test_trailing_slash_self_id_still_excluded() {
        let pool = HttpPool::new("http://127.0.0.1:8001/", PoolOptions::default());
        pool.set_peers(["http://127.0.0.1:8001/", " http://127.0.0.1:8002/ "]);

        assert_eq!(pool.self_id(), SELF);
        assert_eq!(pool.peers(), vec![SELF, "http://127.0.0.1:8002"]);

        let mut owned_by_self = 0;
        for i in 0..200 {
            let key = format!("key{}", i);
            if pool.owner_of(&key).as_deref() == Some(SELF) {
                owned_by_self += 1;
                assert!(pool.pick_peer(&key).is_none(), "{} routed to self", key);
            }
        }
        assert!(owned_by_self > 0);
    }

    #[test]
    fn test_base_path_is_normalized() {
        let options = PoolOptions {
            base_path: "_peercache/".to_string(),
            ..PoolOptions::default()
        };
        let pool = HttpPool::new(SELF, options);
        assert_eq!(pool.options().base_path, "/_peercache");
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path("/_peercache"), "/_peercache");
        assert_eq!(normalize_base_path("cache/v2/"), "/cache/v2");
        assert_eq!(normalize_base_path(" / "), DEFAULT_BASE_PATH);
    }
}
