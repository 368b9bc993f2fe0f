//! settings-gate/crates/domains/src/lib.rs
//!
//! Domain models, errors and port definitions for settings-gate.

pub mod clock;
pub mod error;
pub mod models;
pub mod reference;
pub mod traits;

// Re-exporting for easier access in other crates
pub use clock::*;
pub use error::*;
pub use models::*;
pub use traits::*;
