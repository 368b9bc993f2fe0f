//! # services
//!
//! Application services sitting between the HTTP adapters and the storage ports.
//! Each service receives its collaborators at construction time.

pub mod feedback;
pub mod preferences;

pub use feedback::{FeedbackEligibility, FeedbackGate, DEFAULT_COOLDOWN_HOURS};
pub use preferences::PreferenceService;
