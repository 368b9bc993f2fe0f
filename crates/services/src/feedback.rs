//! # Feedback Gate
//!
//! Throttles feedback prompts with a per-user cooldown and accepts submissions.
//!
//! The cooldown is derived from the newest persisted record, so a failed write
//! can never advance it.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use domains::{
    Clock, CooldownStatus, DomainError, FeedbackRecord, FeedbackRepo, FeedbackSubmission, Result,
    UserId,
};
use tracing::{info, instrument, warn};

/// Weekly prompt cadence of the mobile app.
pub const DEFAULT_COOLDOWN_HOURS: i64 = 24 * 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackEligibility {
    pub can_show_feedback: bool,
    pub last_feedback_time: Option<DateTime<Utc>>,
    /// Set only while cooling down.
    pub remaining_seconds: Option<u64>,
}

pub struct FeedbackGate {
    repo: Arc<dyn FeedbackRepo>,
    clock: Arc<dyn Clock>,
    cooldown: Duration,
}

impl FeedbackGate {
    pub fn new(repo: Arc<dyn FeedbackRepo>, clock: Arc<dyn Clock>, cooldown: Duration) -> Self {
        Self {
            repo,
            clock,
            cooldown,
        }
    }

    /// `true` when the user may be prompted.
    ///
    /// Fails open: if storage cannot be read, the prompt is allowed.
    pub async fn check_feedback_cooldown(&self, user_id: &UserId) -> bool {
        self.eligibility(user_id).await.can_show_feedback
    }

    /// Everything a prompt surface needs in one storage read. Fails open like
    /// [`Self::check_feedback_cooldown`].
    #[instrument(skip(self, user_id), fields(user = %user_id))]
    pub async fn eligibility(&self, user_id: &UserId) -> FeedbackEligibility {
        match self.last_feedback_time(user_id).await {
            Ok(last) => {
                let status = CooldownStatus::evaluate(last, self.cooldown, self.clock.now());
                FeedbackEligibility {
                    can_show_feedback: status.can_show_feedback(),
                    last_feedback_time: last,
                    remaining_seconds: match status {
                        CooldownStatus::CoolingDown { remaining_seconds } => Some(remaining_seconds),
                        CooldownStatus::Eligible => None,
                    },
                }
            }
            Err(err) => {
                warn!(error = %err, "cooldown lookup failed, allowing prompt");
                FeedbackEligibility {
                    can_show_feedback: true,
                    last_feedback_time: None,
                    remaining_seconds: None,
                }
            }
        }
    }

    /// Strict variant of [`Self::check_feedback_cooldown`] that reports
    /// storage errors and the remaining wait.
    pub async fn cooldown_status(&self, user_id: &UserId) -> Result<CooldownStatus> {
        let last = self.last_feedback_time(user_id).await?;
        Ok(CooldownStatus::evaluate(last, self.cooldown, self.clock.now()))
    }

    pub async fn last_feedback_time(&self, user_id: &UserId) -> Result<Option<DateTime<Utc>>> {
        self.repo
            .latest_submission(user_id)
            .await
            .map_err(DomainError::persistence)
    }

    /// Validates and persists one submission. Returns `true` once stored.
    #[instrument(skip(self, user_id, submission), fields(user = %user_id, source = %submission.source_action))]
    pub async fn submit_feedback(
        &self,
        user_id: &UserId,
        submission: FeedbackSubmission,
    ) -> Result<bool> {
        let record = submission.into_record(user_id.clone(), self.clock.now())?;
        let (id, role, rating) = (record.id, record.role, record.rating);

        self.repo
            .insert(record)
            .await
            .map_err(DomainError::persistence)?;

        info!(%id, %role, rating, "feedback recorded");
        Ok(true)
    }

    pub async fn history(&self, user_id: &UserId) -> Result<Vec<FeedbackRecord>> {
        self.repo
            .list_for_user(user_id)
            .await
            .map_err(DomainError::persistence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domains::{ManualClock, MockFeedbackRepo};
    use tokio_test::{assert_err, assert_ok};

    fn user() -> UserId {
        UserId::parse("u1").unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 9, 30, 0).unwrap()
    }

    fn weekly_gate(repo: MockFeedbackRepo) -> FeedbackGate {
        FeedbackGate::new(
            Arc::new(repo),
            Arc::new(ManualClock::new(t0())),
            Duration::hours(DEFAULT_COOLDOWN_HOURS),
        )
    }

    fn submission(rating: i64) -> FeedbackSubmission {
        FeedbackSubmission {
            role: "requester".into(),
            experience_tags: vec!["quick".into()],
            feedback_text: "great picks".into(),
            rating: rating.into(),
            source_action: "recommendation_accepted".into(),
        }
    }

    #[tokio::test]
    async fn never_submitted_is_eligible() {
        let mut repo = MockFeedbackRepo::new();
        repo.expect_latest_submission().returning(|_| Ok(None));

        let gate = weekly_gate(repo);
        assert!(gate.check_feedback_cooldown(&user()).await);
        assert!(gate.check_feedback_cooldown(&user()).await);
    }

    #[tokio::test]
    async fn storage_outage_fails_open() {
        let mut repo = MockFeedbackRepo::new();
        repo.expect_latest_submission()
            .returning(|_| Err(anyhow::anyhow!("connection reset")));

        let gate = weekly_gate(repo);
        assert!(gate.check_feedback_cooldown(&user()).await);
        assert_err!(gate.cooldown_status(&user()).await);
    }

    #[tokio::test]
    async fn recent_submission_blocks_prompt() {
        let mut repo = MockFeedbackRepo::new();
        repo.expect_latest_submission().returning(|_| Ok(Some(t0())));

        let clock = Arc::new(ManualClock::new(t0() + Duration::hours(1)));
        let gate = FeedbackGate::new(Arc::new(repo), clock.clone(), Duration::hours(24));
        assert!(!gate.check_feedback_cooldown(&user()).await);

        clock.set(t0() + Duration::hours(25));
        assert!(gate.check_feedback_cooldown(&user()).await);
    }

    #[tokio::test]
    async fn eligibility_reports_remaining_wait() {
        let mut repo = MockFeedbackRepo::new();
        repo.expect_latest_submission().returning(|_| Ok(Some(t0())));

        let clock = Arc::new(ManualClock::new(t0() + Duration::hours(20)));
        let gate = FeedbackGate::new(Arc::new(repo), clock, Duration::hours(24));
        assert_eq!(
            gate.eligibility(&user()).await,
            FeedbackEligibility {
                can_show_feedback: false,
                last_feedback_time: Some(t0()),
                remaining_seconds: Some(4 * 3600),
            }
        );
    }

    #[tokio::test]
    async fn submission_is_stamped_with_clock() {
        let mut repo = MockFeedbackRepo::new();
        repo.expect_insert()
            .withf(|record| record.submitted_at == t0() && record.rating == 4)
            .times(1)
            .returning(|_| Ok(()));

        let gate = weekly_gate(repo);
        assert!(assert_ok!(gate.submit_feedback(&user(), submission(4)).await));
    }

    #[tokio::test]
    async fn invalid_rating_never_reaches_storage() {
        let mut repo = MockFeedbackRepo::new();
        repo.expect_insert().never();

        let gate = weekly_gate(repo);
        let err = gate.submit_feedback(&user(), submission(6)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn failed_insert_is_persistence_error() {
        let mut repo = MockFeedbackRepo::new();
        repo.expect_insert()
            .returning(|_| Err(anyhow::anyhow!("disk full")));

        let gate = weekly_gate(repo);
        let err = gate.submit_feedback(&user(), submission(3)).await.unwrap_err();
        assert_eq!(err, DomainError::Persistence("disk full".into()));
    }
}
