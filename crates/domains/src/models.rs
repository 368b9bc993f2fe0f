//! # Domain Models
//!
//! Per-user preference and feedback entities.
//! Feedback records get UUID v4 ids and are never updated after creation.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{DomainError, Result};

/// Lowest accepted feedback rating.
pub const MIN_RATING: i64 = 1;
/// Highest accepted feedback rating.
pub const MAX_RATING: i64 = 5;

/// Opaque identifier of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// A blank id means there is no user context.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::NotAuthenticated);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The stored Do Not Disturb flag for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreference {
    pub user_id: UserId,
    pub dnd_enabled: bool,
}

/// Which side of the app the feedback came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackRole {
    Requester,
    Recommender,
}

impl FeedbackRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Requester => "requester",
            Self::Recommender => "recommender",
        }
    }
}

impl FromStr for FeedbackRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "requester" => Ok(Self::Requester),
            "recommender" => Ok(Self::Recommender),
            other => Err(DomainError::Validation(format!("unknown role '{other}'"))),
        }
    }
}

impl fmt::Display for FeedbackRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw submission as received from a caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub role: String,
    #[serde(default)]
    pub experience_tags: Vec<String>,
    #[serde(default)]
    pub feedback_text: String,
    /// Kept as raw JSON so a wrong type is a validation failure, not a
    /// malformed payload.
    #[serde(default)]
    pub rating: Value,
    #[serde(default)]
    pub source_action: String,
}

impl FeedbackSubmission {
    /// Validates the submission and stamps it into an immutable record.
    pub fn into_record(self, user_id: UserId, submitted_at: DateTime<Utc>) -> Result<FeedbackRecord> {
        let role: FeedbackRole = self.role.parse()?;

        let rating = parse_rating(&self.rating)?;

        // Free-text "Other: ..." answers arrive as tags too, so length is not capped.
        let experience_tags = self
            .experience_tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>();

        Ok(FeedbackRecord {
            id: Uuid::new_v4(),
            user_id,
            role,
            experience_tags,
            feedback_text: self.feedback_text,
            rating,
            source_action: self.source_action,
            submitted_at,
        })
    }
}

/// Whole numbers in `MIN_RATING..=MAX_RATING`; `4.0` counts as `4`.
fn parse_rating(raw: &Value) -> Result<u8> {
    let whole = match raw {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_RATING as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    };

    match whole {
        Some(r) if (MIN_RATING..=MAX_RATING).contains(&r) => Ok(r as u8),
        _ => Err(DomainError::Validation(format!(
            "rating {raw} outside {MIN_RATING}..={MAX_RATING}"
        ))),
    }
}

/// An accepted piece of app feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub role: FeedbackRole,
    pub experience_tags: BTreeSet<String>,
    pub feedback_text: String,
    pub rating: u8,
    /// Label of the UI action that opened the prompt
    pub source_action: String,
    pub submitted_at: DateTime<Utc>,
}

/// Whether a user may be prompted for feedback right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CooldownStatus {
    Eligible,
    CoolingDown { remaining_seconds: u64 },
}

impl CooldownStatus {
    /// Applies the cooldown window to the newest accepted submission.
    pub fn evaluate(
        last_feedback_time: Option<DateTime<Utc>>,
        cooldown: chrono::Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let Some(last) = last_feedback_time else {
            return Self::Eligible;
        };
        let elapsed = now.signed_duration_since(last).max(chrono::Duration::zero());
        if elapsed >= cooldown {
            Self::Eligible
        } else {
            let remaining = (cooldown - elapsed).num_seconds().max(1);
            Self::CoolingDown {
                remaining_seconds: remaining as u64,
            }
        }
    }

    pub fn can_show_feedback(self) -> bool {
        matches!(self, Self::Eligible)
    }
}
