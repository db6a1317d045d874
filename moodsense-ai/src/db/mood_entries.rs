//! Mood entry database operations
//!
//! Stores fused estimates and aggregates them per day for history views.
//! Timestamps are written as UTC `YYYY-MM-DD HH:MM:SS` text.

use chrono::{DateTime, Utc};
use moodsense_common::{time, Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

use crate::fusion::{round_to, FusionResult};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest history window accepted by [`get_user_mood_history`]
pub const MAX_HISTORY_DAYS: u32 = 3650;

/// Mood entry ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewMoodEntry {
    pub user_id: i64,
    pub text_entry: Option<String>,
    /// Text mood score, when the text signal was usable
    pub text_sentiment: Option<f64>,
    /// Facial mood score, when the visual signal succeeded
    pub visual_sentiment: Option<f64>,
    /// Final fused mood
    pub combined_score: f64,
    pub stress_level: f64,
    pub confidence: f64,
}

impl NewMoodEntry {
    /// Build an entry from a fused estimate and the text that produced it
    pub fn from_fusion(user_id: i64, text: Option<&str>, result: &FusionResult) -> Self {
        let text_sentiment = result
            .text_analysis
            .as_ref()
            .filter(|t| t.is_usable())
            .map(|t| t.score);
        let visual_sentiment = result
            .visual_analysis
            .as_ref()
            .filter(|v| v.is_usable())
            .map(|v| v.mood_score);

        Self {
            user_id,
            text_entry: text.map(str::to_string).filter(|t| !t.trim().is_empty()),
            text_sentiment,
            visual_sentiment,
            combined_score: result.final_mood,
            stress_level: result.final_stress,
            confidence: result.confidence,
        }
    }
}

/// Stored mood entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: i64,
    pub text_entry: Option<String>,
    pub text_sentiment: Option<f64>,
    pub visual_sentiment: Option<f64>,
    pub combined_score: f64,
    pub stress_level: f64,
    pub confidence: f64,
    pub created_at: String,
}

/// Per-day averages for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMood {
    /// Calendar day (UTC), `YYYY-MM-DD`
    pub date: String,
    pub avg_mood: f64,
    pub avg_stress: f64,
    pub entries: i64,
}

/// Today's averages for one user; averages are absent with no entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayMoodStats {
    pub avg_mood: Option<f64>,
    pub avg_stress: Option<f64>,
    pub entries: i64,
}

/// Insert a mood entry stamped with the current time
///
/// Returns the new entry id.
pub async fn create_mood_entry(pool: &SqlitePool, entry: &NewMoodEntry) -> Result<i64> {
    create_mood_entry_at(pool, entry, time::now()).await
}

/// Insert a mood entry with an explicit timestamp
pub async fn create_mood_entry_at(
    pool: &SqlitePool,
    entry: &NewMoodEntry,
    created_at: DateTime<Utc>,
) -> Result<i64> {
    let created_at = created_at.format(TIMESTAMP_FORMAT).to_string();

    let result = sqlx::query(
        r#"
        INSERT INTO mood_entries (
            user_id, text_entry, text_sentiment, visual_sentiment,
            combined_score, stress_level, confidence, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(entry.user_id)
    .bind(&entry.text_entry)
    .bind(entry.text_sentiment)
    .bind(entry.visual_sentiment)
    .bind(entry.combined_score)
    .bind(entry.stress_level)
    .bind(entry.confidence)
    .bind(&created_at)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    tracing::debug!("Stored mood entry {} for user {}", id, entry.user_id);

    Ok(id)
}

/// Load a single mood entry
pub async fn get_mood_entry(pool: &SqlitePool, id: i64) -> Result<Option<MoodEntry>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, text_entry, text_sentiment, visual_sentiment,
               combined_score, stress_level, confidence, created_at
        FROM mood_entries
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| MoodEntry {
        id: row.get("id"),
        user_id: row.get("user_id"),
        text_entry: row.get("text_entry"),
        text_sentiment: row.get("text_sentiment"),
        visual_sentiment: row.get("visual_sentiment"),
        combined_score: row.get("combined_score"),
        stress_level: row.get("stress_level"),
        confidence: row.get("confidence"),
        created_at: row.get("created_at"),
    }))
}

/// Per-day mood/stress averages over the last `days` days, newest day first
///
/// The window starts at midnight UTC `days` days ago.
pub async fn get_user_mood_history(
    pool: &SqlitePool,
    user_id: i64,
    days: u32,
) -> Result<Vec<DailyMood>> {
    if days == 0 || days > MAX_HISTORY_DAYS {
        return Err(Error::InvalidInput(format!(
            "days must be between 1 and {} (got {})",
            MAX_HISTORY_DAYS, days
        )));
    }

    let since = time::days_ago(days).format(TIMESTAMP_FORMAT).to_string();

    let rows = sqlx::query(
        r#"
        SELECT date(created_at) AS day,
               AVG(combined_score) AS avg_mood,
               AVG(stress_level) AS avg_stress,
               COUNT(*) AS entries
        FROM mood_entries
        WHERE user_id = ?
          AND created_at >= ?
        GROUP BY date(created_at)
        ORDER BY day DESC
        "#,
    )
    .bind(user_id)
    .bind(&since)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| DailyMood {
            date: row.get("day"),
            avg_mood: round_to(row.get("avg_mood"), 1),
            avg_stress: round_to(row.get("avg_stress"), 1),
            entries: row.get("entries"),
        })
        .collect())
}

/// Today's (UTC) average mood/stress and entry count
pub async fn get_today_mood_stats(pool: &SqlitePool, user_id: i64) -> Result<TodayMoodStats> {
    let today = time::now().format(DATE_FORMAT).to_string();

    let row = sqlx::query(
        r#"
        SELECT AVG(combined_score) AS avg_mood,
               AVG(stress_level) AS avg_stress,
               COUNT(*) AS entries
        FROM mood_entries
        WHERE user_id = ?
          AND date(created_at) = ?
        "#,
    )
    .bind(user_id)
    .bind(&today)
    .fetch_one(pool)
    .await?;

    let avg_mood: Option<f64> = row.get("avg_mood");
    let avg_stress: Option<f64> = row.get("avg_stress");

    Ok(TodayMoodStats {
        avg_mood: avg_mood.map(|m| round_to(m, 1)),
        avg_stress: avg_stress.map(|s| round_to(s, 1)),
        entries: row.get("entries"),
    })
}
