use crate::error::CacheError;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Type-erased loader supplied by the embedding application.
/// Takes the key and resolves to the raw value bytes or an error.
pub type LoaderFn = Arc<
    dyn Fn(String) -> Pin<Box<dyn Future<Output = anyhow::Result<Vec<u8>>> + Send>> + Send + Sync,
>;

/// A lookup of `key` in `group`, as sent to the owning peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub group: String,
    pub key: String,
}

/// The value a peer holds for the requested key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub value: Vec<u8>,
}

/// What a group does when the owning peer cannot be reached or answers with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RemoteFailurePolicy {
    /// Log the failure and run the local loader instead.
    #[default]
    FallbackLocal,
    /// Return the remote error to the caller.
    Propagate,
}

/// Counters kept per group.
#[derive(Debug, Default)]
pub struct GroupStats {
    /// Calls to `get`, hits included.
    pub gets: AtomicU64,
    pub cache_hits: AtomicU64,
    /// Deduplicated loads, i.e. misses that actually did work.
    pub loads: AtomicU64,
    pub peer_loads: AtomicU64,
    pub peer_errors: AtomicU64,
    pub local_loads: AtomicU64,
    pub local_load_errs: AtomicU64,
    pub evictions: AtomicU64,
}

impl GroupStats {
    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            gets: self.gets.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            peer_loads: self.peer_loads.load(Ordering::Relaxed),
            peer_errors: self.peer_errors.load(Ordering::Relaxed),
            local_loads: self.local_loads.load(Ordering::Relaxed),
            local_load_errs: self.local_load_errs.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            cache_items: 0,
            cache_bytes: 0,
        }
    }
}

/// Point-in-time copy of a group's counters plus cache occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub gets: u64,
    pub cache_hits: u64,
    pub loads: u64,
    pub peer_loads: u64,
    pub peer_errors: u64,
    pub local_loads: u64,
    pub local_load_errs: u64,
    pub evictions: u64,
    pub cache_items: usize,
    pub cache_bytes: usize,
}

impl StatsSnapshot {
    /// JSON body served by the stats endpoint.
    pub fn to_json(&self) -> crate::error::Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CacheError::Serialization(e.to_string()))
    }
}
