//! Mood history API handlers
//!
//! GET /users/:user_id/mood/history, GET /users/:user_id/mood/today

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::mood_entries::{self, DailyMood, TodayMoodStats},
    error::ApiResult,
    AppState,
};

pub const DEFAULT_HISTORY_DAYS: u32 = 30;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub user_id: i64,
    pub days: u32,
    pub history: Vec<DailyMood>,
}

#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub user_id: i64,
    #[serde(flatten)]
    pub stats: TodayMoodStats,
}

/// GET /users/:user_id/mood/history?days=N
///
/// Per-day averages, newest day first. `days` defaults to 30; values
/// outside 1..=3650 are rejected with 400.
pub async fn mood_history(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let days = query.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    let history = mood_entries::get_user_mood_history(&state.db, user_id, days).await?;

    Ok(Json(HistoryResponse {
        user_id,
        days,
        history,
    }))
}

/// GET /users/:user_id/mood/today
pub async fn mood_today(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<TodayResponse>> {
    let stats = mood_entries::get_today_mood_stats(&state.db, user_id).await?;
    Ok(Json(TodayResponse { user_id, stats }))
}

/// Build mood history routes
pub fn mood_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/mood/history", get(mood_history))
        .route("/users/:user_id/mood/today", get(mood_today))
}
