//! # Preference Store
//!
//! Per-user Do Not Disturb flag. Reads always go to the repository. While a
//! write is in flight the requested value is visible through
//! [`PreferenceService::cached_dnd`]; once the write settles the entry is
//! dropped, so a failed write leaves storage as the only source of truth.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use domains::{DomainError, PreferenceRepo, Result, UserId, UserPreference};
use tracing::{debug, instrument, warn};

/// An optimistic value and the write that put it there.
#[derive(Debug, Clone, Copy)]
struct PendingWrite {
    enabled: bool,
    write_id: u64,
}

pub struct PreferenceService {
    repo: Arc<dyn PreferenceRepo>,
    /// Only holds users with a write in flight.
    pending: DashMap<UserId, PendingWrite>,
    next_write_id: AtomicU64,
}

impl PreferenceService {
    pub fn new(repo: Arc<dyn PreferenceRepo>) -> Self {
        Self {
            repo,
            pending: DashMap::new(),
            next_write_id: AtomicU64::new(0),
        }
    }

    /// Returns the stored flag, `false` when the user never set one.
    #[instrument(skip(self, user_id), fields(user = %user_id))]
    pub async fn get_dnd_enabled(&self, user_id: &UserId) -> Result<bool> {
        let stored = self
            .repo
            .get_dnd(user_id)
            .await
            .map_err(DomainError::persistence)?;
        Ok(stored.unwrap_or(false))
    }

    #[instrument(skip(self, user_id), fields(user = %user_id))]
    pub async fn preference(&self, user_id: &UserId) -> Result<UserPreference> {
        let dnd_enabled = self.get_dnd_enabled(user_id).await?;
        Ok(UserPreference {
            user_id: user_id.clone(),
            dnd_enabled,
        })
    }

    /// Persists the flag. The optimistic entry is withdrawn when the write
    /// settles, unless a newer write for the same user has replaced it.
    #[instrument(skip(self, user_id), fields(user = %user_id))]
    pub async fn update_dnd_setting(&self, user_id: &UserId, enabled: bool) -> Result<()> {
        let write_id = self.next_write_id.fetch_add(1, Ordering::Relaxed);
        self.pending
            .insert(user_id.clone(), PendingWrite { enabled, write_id });

        let outcome = self.repo.set_dnd(user_id, enabled).await;
        self.pending
            .remove_if(user_id, |_, pending| pending.write_id == write_id);

        match outcome {
            Ok(()) => {
                debug!(enabled, "DND setting stored");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "DND write failed, rolling back");
                Err(DomainError::persistence(err))
            }
        }
    }

    /// The value of the newest in-flight write, without touching storage.
    pub fn cached_dnd(&self, user_id: &UserId) -> Option<bool> {
        self.pending.get(user_id).map(|entry| entry.enabled)
    }
}
