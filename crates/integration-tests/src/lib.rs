//! Shared fixtures for the end-to-end tests: services wired to in-memory
//! storage and a clock the test controls.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use domains::{FeedbackSubmission, ManualClock, UserId};
use services::{FeedbackGate, PreferenceService};
use storage_adapters::{InMemoryFeedbackRepo, InMemoryPreferenceRepo};

pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub preference_repo: Arc<InMemoryPreferenceRepo>,
    pub feedback_repo: Arc<InMemoryFeedbackRepo>,
    pub preferences: Arc<PreferenceService>,
    pub feedback: Arc<FeedbackGate>,
}

impl Harness {
    pub fn new(cooldown: Duration) -> Self {
        let clock = Arc::new(ManualClock::new(epoch()));
        let preference_repo = Arc::new(InMemoryPreferenceRepo::new());
        let feedback_repo = Arc::new(InMemoryFeedbackRepo::new());

        let preferences = Arc::new(PreferenceService::new(preference_repo.clone()));
        let feedback = Arc::new(FeedbackGate::new(
            feedback_repo.clone(),
            clock.clone(),
            cooldown,
        ));

        Self {
            clock,
            preference_repo,
            feedback_repo,
            preferences,
            feedback,
        }
    }

    #[cfg(feature = "web-axum")]
    pub fn router(&self) -> axum::Router {
        api_adapters::router(api_adapters::AppState {
            preferences: self.preferences.clone(),
            feedback: self.feedback.clone(),
            clock: self.clock.clone(),
        })
    }
}

/// `t0` of every scenario.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn user(id: &str) -> UserId {
    UserId::parse(id).unwrap_or_else(|err| panic!("bad test user id {id:?}: {err}"))
}

pub fn submission(role: &str, rating: i64) -> FeedbackSubmission {
    FeedbackSubmission {
        role: role.to_string(),
        experience_tags: vec!["quick replies".into()],
        feedback_text: "found a great ramen spot".into(),
        rating: rating.into(),
        source_action: "recommendation_received".into(),
    }
}
