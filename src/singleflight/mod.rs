//! Call Deduplication Module
//!
//! Collapses concurrent loads of the same key into a single execution.
//!
//! ## Mechanics
//! - The first caller for a key registers an in-flight record (a `watch` channel) and runs the load.
//! - Callers arriving while the load runs clone the receiver, release the table lock, and await the
//!   published result. The table lock is never held across the load or the wait, so a load may
//!   call back into the same or another group without deadlocking.
//! - When the load finishes the record is removed. Results are not memoized past that point.
//! - If the leading future is dropped before publishing, the record is released and the waiters
//!   race again; one of them becomes the new leader.

pub mod group;

pub use self::group::CallGroup;

#[cfg(test)]
mod tests;
