//! Request Deduplication
//!
//! Collapses concurrent loads of the same key into a single execution whose
//! outcome is shared by every caller of the burst.

use std::collections::HashMap;
use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::error::{CacheError, Result};

type Outcome<T> = Option<Result<T>>;

// == Flight Group ==
/// Tracks in-flight calls by key.
///
/// The map lock is only held to register or look up a call, never while the
/// call itself runs, so slow keys do not block unrelated ones.
#[derive(Debug)]
pub struct FlightGroup<T> {
    calls: Mutex<HashMap<String, watch::Receiver<Outcome<T>>>>,
}

impl<T> Default for FlightGroup<T> {
    fn default() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> FlightGroup<T> {
    pub fn new() -> Self {
        Self::default()
    }

    // == Work ==
    /// Runs `f` for `key` unless a call for the same key is already running,
    /// in which case the result of that call is awaited and returned instead.
    ///
    /// Every caller of one burst observes the same value or the same error.
    pub async fn work<F, Fut>(&self, key: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let joined = {
            let mut calls = self.calls.lock();
            match calls.get(key) {
                Some(rx) => Err(rx.clone()),
                None => {
                    let (tx, rx) = watch::channel(None);
                    calls.insert(key.to_string(), rx);
                    Ok(tx)
                }
            }
        };

        match joined {
            Ok(tx) => {
                // Removes the record even if this future is dropped mid-call.
                let _guard = CallGuard {
                    calls: &self.calls,
                    key,
                };
                let result = f().await;
                tx.send_replace(Some(result.clone()));
                result
            }
            Err(mut rx) => {
                debug!(key, "joining in-flight call");
                match rx.wait_for(Option::is_some).await {
                    Ok(outcome) => outcome
                        .clone()
                        .unwrap_or_else(|| Err(abandoned(key))),
                    Err(_) => Err(abandoned(key)),
                }
            }
        }
    }

    /// Returns the number of keys with a call currently running.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }
}

fn abandoned(key: &str) -> CacheError {
    CacheError::Internal(format!("load for key '{}' was abandoned", key))
}

struct CallGuard<'a, T> {
    calls: &'a Mutex<HashMap<String, watch::Receiver<Outcome<T>>>>,
    key: &'a str,
}

impl<T> Drop for CallGuard<'_, T> {
    fn drop(&mut self) {
        self.calls.lock().remove(self.key);
    }
}
