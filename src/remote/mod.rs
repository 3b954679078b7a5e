//! Peer Wire Protocol Module
//!
//! HTTP transport between cache nodes. Every node serves lookups for the groups it hosts and
//! queries other nodes for keys they own.
//!
//! ## Wire Format
//! - `GET <base_path><group>/<key>` with both segments percent-encoded, empty body.
//! - `200` with `application/octet-stream` body holding a bincode-encoded `Response { value }`.
//! - `400` malformed path, `404` unknown group, `500` loader or internal failure. Error bodies are
//!   plain text.
//!
//! ## Submodules
//! - **`protocol`**: Endpoint constants, `Request`/`Response` messages and path helpers.
//! - **`handlers`**: The axum side: `PeerServer` and its router.
//! - **`client`**: `HttpGetter`, the `PeerGetter` implementation over `reqwest`.
//! - **`pool`**: `HttpPool`, the `PeerPicker` holding the hash ring and one getter per peer.

pub mod client;
pub mod handlers;
pub mod pool;
pub mod protocol;

pub use self::client::HttpGetter;
pub use self::handlers::{PeerServer, router};
pub use self::pool::{HttpPool, PoolOptions};
pub use self::protocol::{DEFAULT_BASE_PATH, Request, Response};
