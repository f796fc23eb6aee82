//! # lostfound Storage
//!
//! Holds submitted reports and hands the matcher its candidate pool.
//!
//! - [`ItemStore`] - thread-safe in-memory store with monotonic ids
//! - [`persistence`] - whole-store bincode snapshots, written atomically

pub mod persistence;
pub mod store;

pub use persistence::{load_snapshot, save_snapshot, StoreSnapshot};
pub use store::ItemStore;
