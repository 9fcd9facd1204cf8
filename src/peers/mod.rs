//! Peers Module
//!
//! Routing of keys to the peer that owns them and fetching values from
//! remote peers over HTTP.

mod client;
mod codec;
pub mod path;
mod pool;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use client::HttpGetter;
pub use codec::WireCodec;
pub use pool::{
    normalize_base_path, normalize_peer, HttpPool, PoolOptions, DEFAULT_BASE_PATH, DEFAULT_REPLICAS,
};

// == Peer Picker ==
/// Chooses the peer responsible for a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the owning remote peer, or `None` when the key belongs to this
    /// process or no peers are configured.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

// == Peer Getter ==
/// Handle to one remote peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    /// Fetches the raw value of `key` in `group` from the remote peer.
    ///
    /// Any failure is reported as [`crate::error::CacheError::RemoteFetch`];
    /// no retry is attempted here.
    async fn fetch(&self, group: &str, key: &str) -> Result<Vec<u8>>;

    /// Peer identifier, used for logging.
    fn peer(&self) -> &str;
}
