//! Combined mood analysis API handler
//!
//! POST /analyze

use axum::{extract::State, routing::post, Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::{
    db::mood_entries::{self, NewMoodEntry},
    error::{ApiError, ApiResult},
    fusion::{FusionResult, ManualOverride},
    AppState,
};

/// Analysis request; every field is optional
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub text: Option<String>,
    /// JPEG/PNG bytes, plain base64 or a `data:` URI
    pub image_base64: Option<String>,
    pub manual_mood: Option<f64>,
    pub manual_stress: Option<f64>,
    /// When present the result is stored as a mood entry
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub result: FusionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<i64>,
}

/// Decode a base64 image, accepting an optional data-URI prefix
pub fn decode_image(encoded: &str) -> Result<Vec<u8>, String> {
    let payload = match encoded.split_once(',') {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };
    BASE64
        .decode(payload.trim())
        .map_err(|e| format!("image_base64 is not valid base64: {}", e))
}

/// POST /analyze
///
/// Runs text and image analysis, fuses them with any manual values, and
/// optionally persists the outcome for `user_id`.
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let manual = ManualOverride {
        mood: request.manual_mood,
        stress: request.manual_stress,
    };
    manual.validate().map_err(ApiError::BadRequest)?;

    let image = request
        .image_base64
        .as_deref()
        .map(decode_image)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    tracing::info!(
        has_text = request.text.is_some(),
        image_bytes = image.as_ref().map(Vec::len).unwrap_or(0),
        user_id = ?request.user_id,
        "Mood analysis request"
    );

    let result = state
        .engine
        .analyze_combined(request.text.as_deref(), image.as_deref(), manual)
        .await;

    let entry_id = match request.user_id {
        Some(user_id) => {
            let entry = NewMoodEntry::from_fusion(user_id, request.text.as_deref(), &result);
            match mood_entries::create_mood_entry(&state.db, &entry).await {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::error!("Failed to store mood entry for user {}: {}", user_id, e);
                    *state.last_error.write().await = Some(e.to_string());
                    return Err(e.into());
                }
            }
        }
        None => None,
    };

    Ok(Json(AnalyzeResponse { result, entry_id }))
}

/// Build analysis routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze))
}
