//! Loader Module
//!
//! The source of truth consulted on a genuine cache miss.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;

// == Loader ==
/// Produces the value for a key when no cache has it.
///
/// Called at most once per burst of concurrent misses for the same key.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

// == Loader Fn ==
/// Adapts an async closure into a [`Loader`].
pub struct LoaderFn<F>(F);

/// Wraps `f` so it can be used as a group's loader.
///
/// # Example
/// ```ignore
/// let loader = loader_fn(|key: String| async move { Ok(key.into_bytes()) });
/// ```
pub fn loader_fn<F, Fut>(f: F) -> LoaderFn<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send + 'static,
{
    LoaderFn(f)
}

#[async_trait]
impl<F, Fut> Loader for LoaderFn<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send + 'static,
{
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key.to_string()).await
    }
}

impl<F> fmt::Debug for LoaderFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoaderFn")
    }
}
