//! Cache Group Module
//!
//! A `Group` is a named slice of the keyspace with its own bounded cache, its own loader and,
//! optionally, a view of the peer set.
//!
//! ## Read Path
//! 1. **Local hit**: served straight from the group's `Cache`.
//! 2. **Miss**: one load per key runs at a time (`CallGroup`); concurrent callers share its result.
//! 3. **Placement**: if a `PeerPicker` is registered and names a remote owner, the value is fetched
//!    from that peer. Otherwise the loader supplied by the application runs locally.
//! 4. **Fill**: whatever was loaded is inserted into the local cache, including values that came
//!    from a peer.
//!
//! ## Submodules
//! - **`group`**: The `Group` itself.
//! - **`peers`**: `PeerPicker` / `PeerGetter`, the seams a transport implements.
//! - **`registry`**: `GroupRegistry`, name-to-group lookup used by the peer server.
//! - **`types`**: Loader type, peer messages, remote failure policy and statistics.

pub mod group;
pub mod peers;
pub mod registry;
pub mod types;

pub use self::group::Group;
pub use self::peers::{PeerGetter, PeerPicker};
pub use self::registry::GroupRegistry;
pub use self::types::{
    GroupStats, LoaderFn, RemoteFailurePolicy, Request, Response, StatsSnapshot,
};
