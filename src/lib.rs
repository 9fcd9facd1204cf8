//! Peer Cache - A peer-distributed in-process cache
//!
//! Each process keeps a byte-bounded LRU shard and cooperates with its peers
//! over HTTP: keys are routed to their owner with consistent hashing and
//! concurrent misses for the same key are collapsed into one load.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod flight;
pub mod group;
pub mod models;
pub mod peers;
pub mod ring;

pub use api::AppState;
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{loader_fn, Group, GroupRegistry, Loader};
pub use peers::{HttpPool, PeerGetter, PeerPicker, PoolOptions};
