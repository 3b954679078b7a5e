//! Peer Network Protocol
//!
//! Defines the endpoint layout and the two messages exchanged between nodes.
//! Responses are serialized with bincode; path segments are percent-encoded.
//!
//! URL parsers collapse `.` and `..` segments (also when written as `%2E`), so
//! such a segment is sent behind a literal `~` marker. A segment that itself
//! starts with `~` is marked too, which keeps the escape unambiguous.

use crate::error::{CacheError, Result};

pub use crate::group::{Request, Response};

// --- API Endpoints ---

/// Prefix under which every node answers peer lookups.
pub const DEFAULT_BASE_PATH: &str = "/_cache/";
/// Content type of successful peer responses.
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

// --- Messages ---
// `Request` travels in the path; only `Response` has a body encoding.

pub fn encode_response(res: &Response) -> Result<Vec<u8>> {
    Ok(bincode::serialize(res)?)
}

pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    Ok(bincode::deserialize(bytes)?)
}

// --- Paths ---

/// Normalizes a base path to the `/segment/` form the router expects.
pub fn normalize_base_path(base_path: &str) -> String {
    let cleaned = base_path.trim_matches('/');
    if cleaned.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", cleaned)
    }
}

/// Leading marker on an escaped path segment.
const SEGMENT_MARKER: char = '~';

/// `<base_path><group>/<key>` with both segments percent-encoded.
pub fn peer_path(base_path: &str, group: &str, key: &str) -> String {
    format!(
        "{}{}/{}",
        base_path,
        encode_segment(group),
        encode_segment(key)
    )
}

fn encode_segment(segment: &str) -> String {
    let encoded = urlencoding::encode(segment);
    if segment == "." || segment == ".." || segment.starts_with(SEGMENT_MARKER) {
        format!("{}{}", SEGMENT_MARKER, encoded)
    } else {
        encoded.into_owned()
    }
}

fn decode_segment(raw: &str, what: &str) -> Result<String> {
    let raw = raw.strip_prefix(SEGMENT_MARKER).unwrap_or(raw);
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| CacheError::BadRequest(format!("invalid {} encoding: {}", what, e)))
}

/// Splits a raw request path into `(group, key)`.
///
/// The key is everything after the first `/` following the group, so keys may
/// themselves contain `/`. An empty key is passed through and rejected by the group.
pub fn parse_peer_path(base_path: &str, path: &str) -> Result<(String, String)> {
    let rest = path.strip_prefix(base_path).ok_or_else(|| {
        CacheError::BadRequest(format!("unexpected path: {}", path))
    })?;

    let (group, key) = rest
        .split_once('/')
        .ok_or_else(|| CacheError::BadRequest(format!("expected <group>/<key> in {}", path)))?;
    if group.is_empty() {
        return Err(CacheError::BadRequest(format!("missing group in {}", path)));
    }

    Ok((decode_segment(group, "group")?, decode_segment(key, "key")?))
}
