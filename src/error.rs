//! Error types for the cache core.
//!
//! Every failure a `Group::get` can produce is a `CacheError`. The type is
//! `Clone` because a single deduplicated load hands the same result to every
//! caller that joined it.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type alias using the cache error type.
pub type Result<T> = std::result::Result<T, CacheError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Empty key passed to a group lookup.
    #[error("key is required")]
    InvalidKey,

    /// No group registered under this name.
    #[error("no such group: {0}")]
    GroupNotFound(String),

    /// A group with this name already exists in the registry.
    #[error("duplicate registration of group {0}")]
    DuplicateGroup(String),

    /// `register_peers` was called more than once on a group.
    #[error("peers already registered for group {0}")]
    PeersAlreadyRegistered(String),

    /// The embedding application's loader failed. The message is passed through verbatim.
    #[error("{0}")]
    Loader(String),

    /// A peer answered with a non-success status.
    #[error("peer {peer} returned: {status}")]
    RemoteFetch { peer: String, status: u16 },

    /// The request to a peer never produced a response.
    #[error("request to peer {peer} failed: {msg}")]
    Transport { peer: String, msg: String },

    /// The request to a peer exceeded its deadline.
    #[error("request to peer {peer} timed out")]
    Timeout { peer: String },

    /// Malformed wire payload.
    #[error("serialization failure: {0}")]
    Serialization(String),

    /// Malformed request path on the peer server.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// HTTP status the peer server answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::InvalidKey | CacheError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for failures that came from talking to a remote peer.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CacheError::RemoteFetch { .. }
                | CacheError::Transport { .. }
                | CacheError::Timeout { .. }
                | CacheError::Serialization(_)
        )
    }
}

impl From<bincode::Error> for CacheError {
    fn from(err: bincode::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}
