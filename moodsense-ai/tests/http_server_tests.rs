//! HTTP server & routing integration tests

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::Engine;
use http_body_util::BodyExt;
use moodsense_ai::db::mood_entries::{self, NewMoodEntry};
use moodsense_ai::fusion::fusers::FusionEngine;
use moodsense_ai::{build_router, AppState, MAX_REQUEST_BODY_BYTES};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

/// Create test app state with in-memory database and text-only engine
async fn test_app_state() -> AppState {
    let db_pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    moodsense_ai::db::init_tables(&db_pool).await.unwrap();
    AppState::new(db_pool, FusionEngine::text_only())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_module_and_version() {
    let app = build_router(test_app_state().await);

    let (status, body) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "moodsense-ai");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["visual_analysis"], false);
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn analyze_text_returns_fusion_result() {
    let app = build_router(test_app_state().await);

    let (status, body) = send(
        app,
        post_json("/analyze", json!({ "text": "Great progress today, feeling productive!" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let mood = body["final_mood"].as_f64().unwrap();
    assert!(mood > 5.0 && mood <= 10.0);
    assert!(body["text_analysis"]["label"].is_string());
    assert!(body["visual_analysis"].is_null());
    assert!(body["recommendations"].as_array().unwrap().len() <= 3);
    assert!(body.get("entry_id").is_none());
}

#[tokio::test]
async fn analyze_empty_request_gives_defaults() {
    let app = build_router(test_app_state().await);

    let (status, body) = send(app, post_json("/analyze", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_mood"], 5.0);
    assert_eq!(body["final_stress"], 5.0);
    assert_eq!(body["confidence"], 0.5);
}

#[tokio::test]
async fn analyze_rejects_out_of_range_manual_values() {
    let app = build_router(test_app_state().await);

    let (status, body) = send(app, post_json("/analyze", json!({ "manual_mood": 11.0 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn analyze_rejects_invalid_base64() {
    let app = build_router(test_app_state().await);

    let (status, _) = send(
        app,
        post_json("/analyze", json!({ "image_base64": "%%% not base64 %%%" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_image_without_classifier_is_soft_failure() {
    let app = build_router(test_app_state().await);

    // 8-byte PNG signature
    let (status, body) = send(
        app,
        post_json("/analyze", json!({ "image_base64": "iVBORw0KGgo=" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["visual_analysis"]["success"], false);
    assert_eq!(body["visual_analysis"]["face_detected"], false);
    assert_eq!(body["final_mood"], 5.0);
}

#[tokio::test]
async fn analyze_accepts_multi_megabyte_photo() {
    let app = build_router(test_app_state().await);

    let mut png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    png.resize(3 * 1024 * 1024, 0);
    let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
    assert!(encoded.len() > 2 * 1024 * 1024);

    let (status, body) = send(app, post_json("/analyze", json!({ "image_base64": encoded }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["visual_analysis"]["success"], false);
}

#[tokio::test]
async fn analyze_rejects_body_over_limit() {
    let app = build_router(test_app_state().await);

    let oversized = "A".repeat(MAX_REQUEST_BODY_BYTES + 1);
    let (status, _) = send(app, post_json("/analyze", json!({ "image_base64": oversized }))).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn analyze_with_user_persists_entry() {
    let state = test_app_state().await;
    let db = state.db.clone();
    let app = build_router(state);

    let (status, body) = send(
        app,
        post_json(
            "/analyze",
            json!({ "text": "Long day", "manual_mood": 6.0, "manual_stress": 7.5, "user_id": 7 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let entry_id = body["entry_id"].as_i64().unwrap();

    let stored = mood_entries::get_mood_entry(&db, entry_id).await.unwrap().unwrap();
    assert_eq!(stored.user_id, 7);
    assert_eq!(stored.combined_score, 6.0);
    assert_eq!(stored.stress_level, 7.5);
    assert_eq!(stored.text_entry.as_deref(), Some("Long day"));
}

#[tokio::test]
async fn mood_today_without_entries() {
    let app = build_router(test_app_state().await);

    let (status, body) = send(app, get("/users/3/mood/today")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 3);
    assert_eq!(body["entries"], 0);
    assert!(body["avg_mood"].is_null());
}

#[tokio::test]
async fn mood_history_groups_by_day() {
    let state = test_app_state().await;
    let entry = NewMoodEntry {
        user_id: 5,
        text_entry: None,
        text_sentiment: None,
        visual_sentiment: None,
        combined_score: 6.0,
        stress_level: 4.0,
        confidence: 0.5,
    };
    mood_entries::create_mood_entry(&state.db, &entry).await.unwrap();
    mood_entries::create_mood_entry(&state.db, &entry).await.unwrap();
    let app = build_router(state);

    let (status, body) = send(app, get("/users/5/mood/history?days=7")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days"], 7);
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["entries"], 2);
    assert_eq!(history[0]["avg_mood"], 6.0);
}

#[tokio::test]
async fn mood_history_defaults_to_thirty_days() {
    let app = build_router(test_app_state().await);

    let (status, body) = send(app, get("/users/5/mood/history")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days"], 30);
    assert!(body["history"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn mood_history_rejects_zero_days() {
    let app = build_router(test_app_state().await);

    let (status, body) = send(app, get("/users/5/mood/history?days=0")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn mood_history_rejects_window_over_ten_years() {
    let app = build_router(test_app_state().await);

    let (status, body) = send(app, get("/users/5/mood/history?days=3651")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("3651"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = build_router(test_app_state().await);

    let (status, _) = send(app, get("/does-not-exist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
