//! Group Orchestrator
//!
//! Answers lookups for one cache namespace by combining the local shard,
//! request deduplication, peer routing and the loader.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::cache::{ByteView, CacheShard, CacheStats};
use crate::error::{CacheError, Result};
use crate::flight::FlightGroup;
use crate::group::{GroupStats, GroupStatsSnapshot, Loader};
use crate::peers::{PeerGetter, PeerPicker};

// == Group ==
/// A named cache namespace and its associated data loaded spread over peers.
pub struct Group {
    name: String,
    loader: Arc<dyn Loader>,
    /// Values this process owns
    main_cache: CacheShard,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    flight: FlightGroup<ByteView>,
    stats: GroupStats,
}

impl Group {
    // == Constructor ==
    /// Creates a group. Use [`crate::group::GroupRegistry::create_group`] to
    /// make it reachable from peers.
    ///
    /// # Arguments
    /// * `name` - Namespace of the group
    /// * `max_bytes` - Byte budget of the local shard, 0 = unbounded
    /// * `loader` - Source of truth for misses
    pub fn new(name: impl Into<String>, max_bytes: usize, loader: Arc<dyn Loader>) -> Self {
        Self {
            name: name.into(),
            loader,
            main_cache: CacheShard::new(max_bytes),
            peers: OnceLock::new(),
            flight: FlightGroup::new(),
            stats: GroupStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Sets the peer picker used to route misses. May only be called once.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers.set(peers).map_err(|_| {
            CacheError::InvalidRequest(format!(
                "peers already registered for group '{}'",
                self.name
            ))
        })
    }

    // == Get ==
    /// Returns the value for `key`.
    ///
    /// Hits are answered from the local shard. Misses are deduplicated and
    /// then fetched from the owning peer, or loaded locally when this process
    /// owns the key or the peer could not be reached.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("key is required".to_string()));
        }
        self.stats.record_get();

        if let Some(value) = self.main_cache.get(key) {
            debug!(group = %self.name, key, "cache hit");
            self.stats.record_hit();
            return Ok(value);
        }

        self.flight.work(key, || self.load(key)).await
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        self.stats.record_load();

        if let Some(peer) = self.peers.get().and_then(|picker| picker.pick_peer(key)) {
            match self.get_from_peer(peer.as_ref(), key).await {
                Ok(value) => {
                    self.stats.record_peer_load();
                    return Ok(value);
                }
                Err(err) => {
                    self.stats.record_peer_error();
                    warn!(
                        group = %self.name,
                        key,
                        peer = peer.peer(),
                        error = %err,
                        "failed to get from peer, loading locally"
                    );
                }
            }
        }

        self.get_locally(key).await
    }

    /// Remote values are owned by the remote shard and are not stored here.
    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let bytes = peer.fetch(&self.name, key).await?;
        Ok(ByteView::new(bytes))
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        match self.loader.load(key).await {
            Ok(bytes) => {
                self.stats.record_local_load();
                let value = ByteView::new(bytes);
                self.populate_cache(key, value.clone());
                Ok(value)
            }
            Err(err) => {
                self.stats.record_local_load_err();
                Err(CacheError::Loader(format!("{:#}", err)))
            }
        }
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }

    // == Stats ==
    pub fn stats(&self) -> GroupStatsSnapshot {
        self.stats.snapshot()
    }

    /// Returns statistics of the local shard.
    pub fn cache_stats(&self) -> CacheStats {
        self.main_cache.stats()
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .field("peers_registered", &self.peers.get().is_some())
            .finish()
    }
}
