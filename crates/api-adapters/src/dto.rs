//! Wire shapes for the HTTP API. Field names follow the web client (camelCase).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use domains::{FeedbackRecord, FeedbackRole};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DndResponse {
    pub dnd_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DndUpdate {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResponse {
    pub can_show_feedback: bool,
    pub last_feedback_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitResponse {
    pub submitted: bool,
}

/// One of the caller's own past submissions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackHistoryEntry {
    pub id: String,
    pub role: FeedbackRole,
    pub experience_tags: BTreeSet<String>,
    pub feedback_text: String,
    pub rating: u8,
    pub source_action: String,
    pub submitted_at: DateTime<Utc>,
}

impl From<FeedbackRecord> for FeedbackHistoryEntry {
    fn from(record: FeedbackRecord) -> Self {
        Self {
            id: record.id.to_string(),
            role: record.role,
            experience_tags: record.experience_tags,
            feedback_text: record.feedback_text,
            rating: record.rating,
            source_action: record.source_action,
            submitted_at: record.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerTime {
    /// ISO-8601, UTC, millisecond precision, `Z` suffix.
    pub now: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}
