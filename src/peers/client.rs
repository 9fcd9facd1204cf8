//! Peer HTTP Client
//!
//! Fetches values from one remote peer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::models::{ErrorResponse, PeerRequest, PeerResponse};
use crate::peers::{path, PeerGetter, WireCodec};

// == HTTP Getter ==
/// Client handle for a single peer, created by [`crate::peers::HttpPool`].
#[derive(Debug, Clone)]
pub struct HttpGetter {
    /// Peer id, e.g. `http://10.0.0.2:8001`
    peer: String,
    base_path: String,
    codec: WireCodec,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpGetter {
    pub fn new(
        peer: impl Into<String>,
        base_path: impl Into<String>,
        codec: WireCodec,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            peer: peer.into(),
            base_path: base_path.into(),
            codec,
            timeout,
            client,
        }
    }

    /// Full URL serving `req` on this peer.
    pub fn url_for(&self, req: &PeerRequest) -> String {
        format!(
            "{}{}",
            self.peer.trim_end_matches('/'),
            path::encode(&self.base_path, req)
        )
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn fetch(&self, group: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.url_for(&PeerRequest::new(group, key));
        debug!(%url, "fetching from peer");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CacheError::RemoteFetch(format!("{}: {}", self.peer, e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| CacheError::RemoteFetch(format!("reading response body: {}", e)))?;

        if status != StatusCode::OK {
            let reason = serde_json::from_slice::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(CacheError::RemoteFetch(format!(
                "{} returned {}: {}",
                self.peer, status, reason
            )));
        }

        let decoded: PeerResponse = self
            .codec
            .decode(&body)
            .map_err(|e| CacheError::RemoteFetch(format!("decoding response body: {}", e)))?;
        Ok(decoded.value)
    }

    fn peer(&self) -> &str {
        &self.peer
    }
}
