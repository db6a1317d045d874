//! moodsense-ai library interface
//!
//! Text and facial-expression signal adapters, the mood/stress fusion
//! engine, mood-entry persistence, and the HTTP API over them.

pub mod api;
pub mod db;
pub mod error;
pub mod fusion;
pub mod logging;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::{extract::DefaultBodyLimit, Router};
use chrono::{DateTime, Utc};
use fusion::fusers::FusionEngine;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Fusion engine, built once at startup
    pub engine: Arc<FusionEngine>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool, engine: FusionEngine) -> Self {
        Self {
            db,
            engine: Arc::new(engine),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Request body cap; base64 photos run about a third larger than the image
pub const MAX_REQUEST_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::analyze_routes())
        .merge(api::mood_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
