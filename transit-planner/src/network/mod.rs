//! Read-only access to the transit network.
//!
//! The planner talks to the network through the [`NetworkStore`] trait.
//! Queries take sets of ids so a request can fetch everything it needs in
//! a handful of round trips instead of one row at a time.
//!
//! [`SnapshotStore`] serves a network held in memory, loaded from a JSON
//! snapshot. It is used by the command-line tool and in tests.

mod snapshot;
mod store;

pub use snapshot::{NetworkSnapshot, SnapshotStore};
pub use store::{NetworkStore, StoreError};
