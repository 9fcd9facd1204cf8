//! Peer Path Codec
//!
//! Builds and parses `<base>/<group>/<key>` request paths. Group and key are
//! percent-escaped so that either may contain `/` or spaces.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{CacheError, Result};
use crate::models::PeerRequest;

/// Characters left unescaped in a path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

// == Encode ==
/// Returns the request path for `req` under `base`.
pub fn encode(base: &str, req: &PeerRequest) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        utf8_percent_encode(&req.group, SEGMENT),
        utf8_percent_encode(&req.key, SEGMENT)
    )
}

// == Decode ==
/// Parses a raw (still escaped) request path back into a [`PeerRequest`].
///
/// Paths outside `base`, without a key segment, or with invalid escapes are
/// reported as [`CacheError::InvalidRequest`].
pub fn decode(base: &str, path: &str) -> Result<PeerRequest> {
    let prefix = format!("{}/", base.trim_end_matches('/'));
    let rest = path.strip_prefix(&prefix).ok_or_else(|| {
        CacheError::InvalidRequest(format!("unexpected path: {}", path))
    })?;

    let (group, key) = rest
        .split_once('/')
        .ok_or_else(|| CacheError::InvalidRequest(format!("expected <group>/<key>, got: {}", rest)))?;

    let req = PeerRequest::new(unescape(group)?, unescape(key)?);
    match req.validate() {
        Some(msg) => Err(CacheError::InvalidRequest(msg)),
        None => Ok(req),
    }
}

fn unescape(segment: &str) -> Result<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| CacheError::InvalidRequest(format!("invalid escape in '{}': {}", segment, e)))
}
