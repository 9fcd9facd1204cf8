//! Consistent Hash Ring
//!
//! Maps keys onto a set of peers so that adding or removing one peer only
//! moves the keys adjacent to it on the ring.

use std::collections::HashMap;
use std::fmt;

/// Hash function used to place peers and keys on the ring.
pub type HashFn = fn(&[u8]) -> u32;

// == Hash Ring ==
/// Sorted ring of virtual nodes, each owned by a real peer.
#[derive(Clone)]
pub struct HashRing {
    hash: HashFn,
    /// Virtual nodes created per real peer
    replicas: usize,
    /// Virtual node hashes, ascending
    keys: Vec<u32>,
    /// Virtual node hash -> peer id
    owners: HashMap<u32, String>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring.
    ///
    /// Falls back to CRC32 (IEEE) when no hash function is supplied.
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Self {
        Self {
            hash: hash.unwrap_or(crc32fast::hash),
            replicas,
            keys: Vec::new(),
            owners: HashMap::new(),
        }
    }

    // == Add ==
    /// Places `replicas` virtual nodes for each peer on the ring.
    ///
    /// Adding a peer that is already present appends another full set of
    /// virtual nodes for it.
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let hash = (self.hash)(format!("{}{}", i, peer).as_bytes());
                self.keys.push(hash);
                self.owners.insert(hash, peer.to_string());
            }
        }
        self.keys.sort_unstable();
    }

    // == Get ==
    /// Returns the peer owning `key`, or `None` when the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&k| k < hash);
        let vnode = self.keys[idx % self.keys.len()];
        self.owners.get(&vnode).map(String::as_str)
    }

    /// Returns the number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("virtual_nodes", &self.keys.len())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    /// Interprets the input as a decimal number, which makes ring
    /// positions predictable.
    fn decimal_hash(data: &[u8]) -> u32 {
        std::str::from_utf8(data)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    #[test]
    fn test_hashing_with_predictable_positions() {
        let mut ring = HashRing::new(3, Some(decimal_hash));

        // Virtual nodes: 2, 4, 6, 12, 14, 16, 22, 24, 26
        ring.add(["6", "4", "2"]);

        let cases = [("2", "2"), ("11", "2"), ("23", "4"), ("27", "2")];
        for (key, peer) in cases {
            assert_eq!(ring.get(key), Some(peer), "asking for {}", key);
        }

        // Adds 8, 18, 28
        ring.add(["8"]);

        // 27 now maps to 8.
        assert_eq!(ring.get("27"), Some("8"));
    }

    #[test]
    fn test_empty_ring_has_no_peer() {
        let ring = HashRing::new(50, None);
        assert!(ring.is_empty());
        assert_eq!(ring.get("anything"), None);
    }

    #[test]
    fn test_two_peers_three_replicas() {
        let mut ring = HashRing::new(3, None);
        ring.add(["A", "B"]);
        assert_eq!(ring.len(), 6);

        let first = ring.get("somekey").map(str::to_string);
        assert!(first.is_some());
        for _ in 0..100 {
            assert_eq!(ring.get("somekey").map(str::to_string), first);
        }

        // Re-adding "A" appends another three virtual nodes.
        ring.add(["A"]);
        assert_eq!(ring.len(), 9);
    }

    #[test]
    fn test_keys_stay_sorted() {
        let mut ring = HashRing::new(10, None);
        ring.add(["http://a:1", "http://b:2"]);
        ring.add(["http://c:3"]);
        assert!(ring.keys.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_single_peer_owns_everything() {
        let mut ring = HashRing::new(5, None);
        ring.add(["only"]);
        for i in 0..50 {
            assert_eq!(ring.get(&format!("key{}", i)), Some("only"));
        }
    }

    #[test]
    fn test_adding_peer_remaps_bounded_fraction() {
        let peers: Vec<String> = (0..4).map(|i| format!("http://10.0.0.{}:8001", i)).collect();
        let mut ring = HashRing::new(50, None);
        ring.add(&peers);

        let keys: Vec<String> = (0..5000).map(|i| format!("key-{}", i)).collect();
        let before: Vec<String> = keys
            .iter()
            .map(|k| ring.get(k).unwrap().to_string())
            .collect();

        ring.add(["http://10.0.0.9:8001"]);

        let moved = keys
            .iter()
            .zip(&before)
            .filter(|(k, owner)| ring.get(k).unwrap() != owner.as_str())
            .count();

        // Ideal is 1/(N+1) = 20%; allow generous slack for hash variance.
        let fraction = moved as f64 / keys.len() as f64;
        assert!(fraction > 0.0, "new peer took no keys");
        assert!(fraction < 0.4, "too many keys moved: {}", fraction);

        // Every key that moved went to the new peer.
        for (k, owner) in keys.iter().zip(&before) {
            let now = ring.get(k).unwrap();
            assert!(now == owner.as_str() || now == "http://10.0.0.9:8001");
        }
    }
}
