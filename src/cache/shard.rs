//! Cache Shard Module
//!
//! Thread-safe wrapper that puts a single mutex around the LRU engine.

use parking_lot::Mutex;
use tracing::trace;

use crate::cache::{ByteView, CacheStats, EvictionCallback, LruCache};

// == Cache Shard ==
/// The local, byte-bounded portion of the distributed cache.
///
/// Every operation is one critical section over both the key index and the
/// recency list. The engine is created on first insert so an unused group
/// costs nothing.
#[derive(Debug)]
pub struct CacheShard {
    max_bytes: usize,
    inner: Mutex<ShardInner>,
}

#[derive(Debug, Default)]
struct ShardInner {
    lru: Option<LruCache<ByteView>>,
    stats: CacheStats,
}

impl CacheShard {
    // == Constructor ==
    /// Creates an empty shard.
    ///
    /// # Arguments
    /// * `max_bytes` - Byte budget for keys plus values, 0 = unbounded
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(ShardInner::default()),
        }
    }

    // == Add ==
    /// Stores a value, evicting least recently used entries if needed.
    pub fn add(&self, key: &str, value: ByteView) {
        let mut inner = self.inner.lock();
        let max_bytes = self.max_bytes;
        let lru = inner.lru.get_or_insert_with(|| {
            let on_evicted: EvictionCallback<ByteView> = Box::new(|key: &str, value: &ByteView| {
                trace!(key, bytes = value.len(), "evicted entry");
            });
            LruCache::new(max_bytes, Some(on_evicted))
        });
        lru.add(key, value);
    }

    // == Get ==
    /// Returns the cached value, promoting it to most recently used.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock();
        let found = inner.lru.as_mut().and_then(|lru| lru.get(key).cloned());
        match found {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        found
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.inner.lock().lru.as_ref().map_or(0, |lru| lru.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes currently held by the shard.
    pub fn used_bytes(&self) -> usize {
        self.inner.lock().lru.as_ref().map_or(0, |lru| lru.used_bytes())
    }

    // == Stats ==
    /// Returns current shard statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.max_bytes = self.max_bytes;
        if let Some(lru) = inner.lru.as_ref() {
            stats.evictions = lru.evictions();
            stats.total_entries = lru.len();
            stats.used_bytes = lru.used_bytes();
        }
        stats
    }
}
