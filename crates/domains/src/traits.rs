//! # Core Traits (Ports)
//!
//! Any storage adapter must implement these traits to be wired into the services.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{FeedbackRecord, UserId};

/// Persistence contract for the per-user Do Not Disturb flag.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PreferenceRepo: Send + Sync {
    /// Returns `None` when nothing was ever stored for the user.
    async fn get_dnd(&self, user_id: &UserId) -> anyhow::Result<Option<bool>>;

    /// Upserts the flag. Last write wins.
    async fn set_dnd(&self, user_id: &UserId, enabled: bool) -> anyhow::Result<()>;
}

/// Persistence contract for feedback records.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait FeedbackRepo: Send + Sync {
    /// Stores one record in a single write; either all of it lands or none.
    async fn insert(&self, record: FeedbackRecord) -> anyhow::Result<()>;

    /// Timestamp of the user's newest record.
    async fn latest_submission(&self, user_id: &UserId) -> anyhow::Result<Option<DateTime<Utc>>>;

    async fn list_for_user(&self, user_id: &UserId) -> anyhow::Result<Vec<FeedbackRecord>>;
}
