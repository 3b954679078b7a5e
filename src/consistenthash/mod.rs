//! Consistent Hashing Module
//!
//! Maps keys to peers on a hash ring.
//!
//! ## Placement
//! - Every peer occupies `replicas` virtual positions, each hashed from `"<index><peer>"`.
//! - A key belongs to the first position clockwise from `hash(key)`, wrapping past the top of the ring.
//! - Adding or removing a peer only moves the keys that fall on that peer's positions.
//!
//! The default hash is CRC-32 (IEEE). Callers may plug in their own `HashFn`.

pub mod ring;

pub use self::ring::{HashFn, Ring, crc32_hash};

#[cfg(test)]
mod tests;
