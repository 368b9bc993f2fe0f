//! # storage-adapters
//!
//! Implementations of the `domains` storage ports.
//! The in-memory adapters are always compiled; SQLite sits behind `db-sqlite`.

pub mod memory;
#[cfg(feature = "db-sqlite")]
pub mod sqlite;

pub use memory::{InMemoryFeedbackRepo, InMemoryPreferenceRepo};
#[cfg(feature = "db-sqlite")]
pub use sqlite::SqliteStore;
