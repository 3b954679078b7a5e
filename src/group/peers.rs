//! Peer capabilities.
//!
//! Groups only see these two traits. The HTTP transport in `crate::remote`
//! implements them; tests and alternate transports can provide their own.

use super::types::{Request, Response};
use crate::error::Result;

use async_trait::async_trait;
use std::sync::Arc;

/// Fetches a value for `(group, key)` from one specific peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, req: &Request) -> Result<Response>;

    /// Address of the peer, used in logs and errors.
    fn peer(&self) -> &str;
}

/// Chooses the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// `None` means the key is handled by this node (or there are no peers at all).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}
