//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the byte budget, recency order and index
//! consistency of the LRU engine against a simple model.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::{ByteView, LruCache};

// == Strategies ==
/// Generates short keys so that operations frequently collide
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e][0-9]{0,2}".prop_map(|s| s)
}

/// Generates values of varied size, including empty ones
fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..24)
}

#[derive(Debug, Clone)]
enum LruOp {
    Add { key: String, value: Vec<u8> },
    Get { key: String },
}

fn lru_op_strategy() -> impl Strategy<Value = LruOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| LruOp::Add { key, value }),
        key_strategy().prop_map(|key| LruOp::Get { key }),
    ]
}

fn entry_size(key: &str, value: &ByteView) -> usize {
    key.len() + value.len()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // *For any* sequence of adds and gets with a non-zero budget, the used
    // byte count never exceeds the budget and always equals the sum of the
    // sizes of the entries still present.
    #[test]
    fn prop_used_bytes_bounded_and_exact(
        max_bytes in 1usize..128,
        ops in prop::collection::vec(lru_op_strategy(), 1..200)
    ) {
        let mut lru: LruCache<ByteView> = LruCache::new(max_bytes, None);
        let mut shadow: HashMap<String, ByteView> = HashMap::new();

        for op in ops {
            match op {
                LruOp::Add { key, value } => {
                    let view = ByteView::new(value);
                    shadow.insert(key.clone(), view.clone());
                    lru.add(key, view);
                }
                LruOp::Get { key } => {
                    let got = lru.get(&key).cloned();
                    if let Some(v) = got {
                        prop_assert_eq!(Some(&v), shadow.get(&key), "stale value for {}", key);
                    }
                }
            }

            prop_assert!(lru.used_bytes() <= max_bytes);

            let keys = lru.keys_mru();
            prop_assert_eq!(keys.len(), lru.len(), "index and list disagree");
            let expected: usize = keys
                .iter()
                .map(|k| entry_size(k, &shadow[k]))
                .sum();
            prop_assert_eq!(lru.used_bytes(), expected);
        }
    }

    // *For any* sequence of adds and gets with no budget, the recency order
    // matches a model where every touched key moves to the front.
    #[test]
    fn prop_recency_order_matches_model(
        ops in prop::collection::vec(lru_op_strategy(), 1..100)
    ) {
        let mut lru: LruCache<ByteView> = LruCache::new(0, None);
        let mut model: Vec<String> = Vec::new();

        for op in ops {
            let touched = match op {
                LruOp::Add { key, value } => {
                    lru.add(key.clone(), ByteView::new(value));
                    Some(key)
                }
                LruOp::Get { key } => lru.get(&key).map(|_| key),
            };
            if let Some(key) = touched {
                model.retain(|k| k != &key);
                model.insert(0, key);
            }
        }

        prop_assert_eq!(lru.keys_mru(), model);
    }

    // *For any* set of distinct keys filling a budget exactly, adding one more
    // entry evicts from the least recently used end first.
    #[test]
    fn prop_eviction_removes_least_recent_first(
        count in 3usize..10,
        touch in 0usize..10
    ) {
        let keys: Vec<String> = (0..count).map(|i| format!("k{}", i)).collect();
        // Every entry is "kN" + 2 bytes = 4 bytes.
        let mut lru: LruCache<ByteView> = LruCache::new(count * 4, None);
        for key in &keys {
            lru.add(key.clone(), ByteView::from("vv"));
        }

        let touched = &keys[touch % count];
        lru.get(touched);

        lru.add("kX", ByteView::from("vv"));

        let expected_victim = if touch % count == 0 { &keys[1] } else { &keys[0] };
        prop_assert!(lru.get(expected_victim).is_none());
        prop_assert!(lru.get(touched).is_some());
        prop_assert_eq!(lru.len(), count);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // *For any* peer set and key, repeated ring lookups agree.
    #[test]
    fn prop_ring_lookup_is_deterministic(
        peers in prop::collection::hash_set("[a-z]{1,8}", 1..6),
        keys in prop::collection::vec("[ -~]{0,16}", 1..30)
    ) {
        let mut ring = crate::ring::HashRing::new(10, None);
        ring.add(&peers);

        for key in &keys {
            let first = ring.get(key).map(str::to_string);
            prop_assert!(first.is_some());
            prop_assert!(peers.contains(first.as_deref().unwrap()));
            for _ in 0..3 {
                prop_assert_eq!(ring.get(key).map(str::to_string), first.clone());
            }
        }
    }

    // *For any* number of concurrent callers of the same key, the work runs
    // once and every caller sees the same value.
    #[test]
    fn prop_flight_runs_once_per_burst(callers in 2usize..16) {
        use crate::flight::FlightGroup;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use std::time::Duration;

        let (values, runs) = tokio_test::block_on(async {
            let group: Arc<FlightGroup<ByteView>> = Arc::new(FlightGroup::new());
            let runs = Arc::new(AtomicUsize::new(0));

            let handles: Vec<_> = (0..callers)
                .map(|_| {
                    let group = group.clone();
                    let runs = runs.clone();
                    tokio::spawn(async move {
                        group
                            .work("key", || async move {
                                runs.fetch_add(1, Ordering::SeqCst);
                                tokio::time::sleep(Duration::from_millis(10)).await;
                                Ok(ByteView::from("value"))
                            })
                            .await
                    })
                })
                .collect();

            let mut values = Vec::new();
            for handle in handles {
                values.push(handle.await.expect("task panicked"));
            }
            (values, runs.load(Ordering::SeqCst))
        });

        prop_assert_eq!(runs, 1);
        prop_assert_eq!(values.len(), callers);
        for v in values {
            prop_assert_eq!(v.unwrap().as_string(), "value");
        }
    }
}
