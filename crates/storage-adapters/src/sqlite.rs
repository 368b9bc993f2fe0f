//! # SQLite adapters
//!
//! Maps the preference and feedback ports onto two tables. The DND flag is
//! stored inverted as `notify_recommender`, the column the profile table has
//! always used. Timestamps are unix milliseconds so ordering is numeric.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    Clock, FeedbackRecord, FeedbackRepo, FeedbackRole, PreferenceRepo, SystemClock, UserId,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::info;
use uuid::Uuid;

/// One pool shared by both ports.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    /// Stamps `profiles.updated_at_ms`.
    clock: Arc<dyn Clock>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url` and applies migrations.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid sqlite url '{url}'"))?
            .create_if_missing(true);

        // Every connection to `:memory:` is its own database.
        let in_memory = url.contains(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("failed to open sqlite pool")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;

        info!(in_memory, "sqlite store ready");
        Ok(Self {
            pool,
            clock: Arc::new(SystemClock),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

fn millis_to_datetime(ms: i64) -> anyhow::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).with_context(|| format!("timestamp out of range: {ms}"))
}

fn row_to_record(row: &SqliteRow) -> anyhow::Result<FeedbackRecord> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let role: String = row.try_get("role")?;
    let tags: String = row.try_get("experience_tags")?;
    let rating: i64 = row.try_get("rating")?;

    Ok(FeedbackRecord {
        id: Uuid::parse_str(&id)?,
        user_id: UserId::parse(&user_id)?,
        role: FeedbackRole::from_str(&role)?,
        experience_tags: serde_json::from_str::<BTreeSet<String>>(&tags)?,
        feedback_text: row.try_get("feedback_text")?,
        rating: u8::try_from(rating)?,
        source_action: row.try_get("source_action")?,
        submitted_at: millis_to_datetime(row.try_get("created_at_ms")?)?,
    })
}

#[async_trait]
impl PreferenceRepo for SqliteStore {
    async fn get_dnd(&self, user_id: &UserId) -> anyhow::Result<Option<bool>> {
        let row = sqlx::query("SELECT notify_recommender FROM profiles WHERE user_id = ?")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let notify: bool = row.try_get("notify_recommender")?;
                Ok(Some(!notify))
            }
            None => Ok(None),
        }
    }

    async fn set_dnd(&self, user_id: &UserId, enabled: bool) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO profiles (user_id, notify_recommender, updated_at_ms) VALUES (?, ?, ?) \
             ON CONFLICT(user_id) DO UPDATE SET \
             notify_recommender = excluded.notify_recommender, \
             updated_at_ms = excluded.updated_at_ms",
        )
        .bind(user_id.as_str())
        .bind(!enabled)
        .bind(self.clock.now().timestamp_millis())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl FeedbackRepo for SqliteStore {
    /// A single INSERT; SQLite commits it atomically.
    async fn insert(&self, record: FeedbackRecord) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO app_feedback \
             (id, user_id, role, experience_tags, feedback_text, rating, source_action, created_at_ms) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(record.user_id.as_str())
        .bind(record.role.as_str())
        .bind(serde_json::to_string(&record.experience_tags)?)
        .bind(record.feedback_text.as_str())
        .bind(i64::from(record.rating))
        .bind(record.source_action.as_str())
        .bind(record.submitted_at.timestamp_millis())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn latest_submission(&self, user_id: &UserId) -> anyhow::Result<Option<DateTime<Utc>>> {
        let latest: Option<i64> =
            sqlx::query_scalar("SELECT MAX(created_at_ms) FROM app_feedback WHERE user_id = ?")
                .bind(user_id.as_str())
                .fetch_one(&self.pool)
                .await?;

        latest.map(millis_to_datetime).transpose()
    }

    async fn list_for_user(&self, user_id: &UserId) -> anyhow::Result<Vec<FeedbackRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM app_feedback WHERE user_id = ? ORDER BY created_at_ms ASC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_record).collect()
    }
}
