//! Cache Module
//!
//! Provides the local, byte-bounded LRU shard that backs each group.

mod byteview;
mod lru;
mod shard;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use byteview::ByteView;
pub use lru::{EvictionCallback, LruCache, Value};
pub use shard::CacheShard;
pub use stats::CacheStats;
