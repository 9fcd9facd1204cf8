//! Wire Codec
//!
//! Encoding of the payloads exchanged between peers. All peers of a cluster
//! must be configured with the same codec.

use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CacheError, Result};

// == Wire Codec ==
/// Serialization format used on the peer wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireCodec {
    /// Compact binary encoding
    #[default]
    Bincode,
    /// JSON, handy when debugging with curl
    Json,
}

impl WireCodec {
    // == Encode ==
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        match self {
            WireCodec::Bincode => Ok(bincode::serialize(value)?),
            WireCodec::Json => Ok(serde_json::to_vec(value)?),
        }
    }

    // == Decode ==
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        match self {
            WireCodec::Bincode => Ok(bincode::deserialize(bytes)?),
            WireCodec::Json => Ok(serde_json::from_slice(bytes)?),
        }
    }

    /// Content type written on peer responses.
    pub fn content_type(&self) -> &'static str {
        match self {
            WireCodec::Bincode => "application/octet-stream",
            WireCodec::Json => "application/json",
        }
    }
}

impl FromStr for WireCodec {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bincode" => Ok(WireCodec::Bincode),
            "json" => Ok(WireCodec::Json),
            other => Err(CacheError::InvalidRequest(format!(
                "unknown codec '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for WireCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireCodec::Bincode => f.write_str("bincode"),
            WireCodec::Json => f.write_str("json"),
        }
    }
}
