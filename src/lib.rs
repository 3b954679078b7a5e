//! Peer-Aware Distributed Cache Library
//!
//! An embeddable cache that spreads keys over a cluster of peers and makes sure an expensive
//! load for a given key runs at most once among concurrent local callers.
//!
//! ## Architecture Modules
//! - **`cache`**: The node-local layer. `ByteView` payloads in a byte-bounded LRU behind one mutex.
//! - **`singleflight`**: Call deduplication. Concurrent misses on one key share a single load.
//! - **`consistenthash`**: Hash ring with virtual replicas mapping keys to peers.
//! - **`group`**: Named cache groups, their loaders, the peer capability traits and the registry.
//! - **`remote`**: HTTP wire protocol. Peer server (axum), peer client (reqwest) and the pool that
//!   picks the owning peer.
//! - **`error`**: `CacheError` and the crate `Result`.

pub mod cache;
pub mod consistenthash;
pub mod error;
pub mod group;
pub mod remote;
pub mod singleflight;

pub use cache::ByteView;
pub use error::{CacheError, Result};
pub use group::{Group, GroupRegistry, PeerGetter, PeerPicker, RemoteFailurePolicy};
pub use remote::{HttpPool, PoolOptions};
