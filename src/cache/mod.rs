//! Local Cache Module
//!
//! The node-local storage layer every cache group sits on.
//!
//! ## Components
//! - **`byteview`**: `ByteView`, the immutable payload handed out to callers. Reads return copies,
//!   so nothing outside the cache can mutate a value the cache still holds.
//! - **`lru`**: `Lru`, a byte-bounded least-recently-used map. Not synchronised on its own.
//! - **`store`**: `Cache`, the `Lru` behind a single mutex. This is what groups hold.
//!
//! Entry size is `key.len() + value.len()`. A capacity of `0` disables eviction.

pub mod byteview;
pub mod lru;
pub mod store;

pub use self::byteview::ByteView;
pub use self::lru::{Lru, OnEvicted};
pub use self::store::Cache;
