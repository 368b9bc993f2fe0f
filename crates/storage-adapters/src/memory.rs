//! # In-memory adapters
//!
//! `DashMap`-backed implementations of the storage ports. Writes for one user
//! hold that user's shard lock for the duration of the mutation, so records are
//! never interleaved. Nothing survives a restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use domains::{FeedbackRecord, FeedbackRepo, PreferenceRepo, UserId};

#[derive(Debug, Default)]
pub struct InMemoryPreferenceRepo {
    flags: DashMap<UserId, bool>,
}

impl InMemoryPreferenceRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceRepo for InMemoryPreferenceRepo {
    async fn get_dnd(&self, user_id: &UserId) -> anyhow::Result<Option<bool>> {
        Ok(self.flags.get(user_id).map(|flag| *flag))
    }

    async fn set_dnd(&self, user_id: &UserId, enabled: bool) -> anyhow::Result<()> {
        self.flags.insert(user_id.clone(), enabled);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryFeedbackRepo {
    records: DashMap<UserId, Vec<FeedbackRecord>>,
}

impl InMemoryFeedbackRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total records across all users.
    pub fn len(&self) -> usize {
        self.records.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FeedbackRepo for InMemoryFeedbackRepo {
    async fn insert(&self, record: FeedbackRecord) -> anyhow::Result<()> {
        self.records
            .entry(record.user_id.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    async fn latest_submission(&self, user_id: &UserId) -> anyhow::Result<Option<DateTime<Utc>>> {
        Ok(self
            .records
            .get(user_id)
            .and_then(|records| records.iter().map(|r| r.submitted_at).max()))
    }

    async fn list_for_user(&self, user_id: &UserId) -> anyhow::Result<Vec<FeedbackRecord>> {
        let mut records = self
            .records
            .get(user_id)
            .map(|records| records.clone())
            .unwrap_or_default();
        records.sort_by_key(|r| r.submitted_at);
        Ok(records)
    }
}
