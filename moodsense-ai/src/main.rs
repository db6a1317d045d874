//! moodsense-ai - Mood analysis microservice
//!
//! Scores free text and face images for mood and stress, fuses the signals
//! (plus optional self-reported values) into one estimate, and records
//! per-user mood entries.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use moodsense_common::config::{self, TomlConfig};
use tokio::signal;
use tracing::{info, warn};

use moodsense_ai::fusion::extractors::{TextSignalAdapter, VisualSignalAdapter};
use moodsense_ai::fusion::fusers::FusionEngine;
use moodsense_ai::services::HttpEmotionClassifier;
use moodsense_ai::AppState;

const MODULE_NAME: &str = "moodsense-ai";

/// Command-line arguments for moodsense-ai
#[derive(Parser, Debug)]
#[command(name = "moodsense-ai")]
#[command(about = "Mood and stress analysis microservice")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "MOODSENSE_PORT")]
    port: Option<u16>,

    /// Root folder holding the database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Path to the TOML config file
    #[arg(short, long, env = "MOODSENSE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(|| config::default_config_path(MODULE_NAME));
    let toml_config = config::load_or_default(config_path.as_deref());

    let _log_guard = moodsense_ai::logging::init_tracing(&toml_config.logging)?;

    info!(
        "Starting moodsense-ai v{} ({}, built {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    config::ensure_root_folder(&root_folder)
        .with_context(|| format!("Failed to initialize root folder {}", root_folder.display()))?;
    info!("Root folder: {}", root_folder.display());

    let db_path = toml_config.database_path(&root_folder);
    info!("Database: {}", db_path.display());
    let db_pool = moodsense_ai::db::init_database_pool(&db_path)
        .await
        .context("Failed to open database")?;
    info!("Database connection established");

    let engine = build_engine(&toml_config)?;
    let state = AppState::new(db_pool, engine);
    let app = moodsense_ai::build_router(state);

    let port = args.port.unwrap_or(toml_config.port);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Build the fusion engine; image analysis is enabled only with a classifier endpoint
fn build_engine(toml_config: &TomlConfig) -> Result<FusionEngine> {
    let classifier = &toml_config.classifier;

    let visual = match &classifier.endpoint {
        Some(endpoint) => {
            let client = HttpEmotionClassifier::new(
                endpoint,
                Duration::from_secs(classifier.timeout_secs),
                classifier.detector_backend.clone(),
            )
            .map_err(|e| anyhow::anyhow!("Failed to build classifier client: {}", e))?;
            info!(
                "Image analysis enabled: {} (detector: {})",
                client.analyze_url(),
                classifier.detector_backend
            );
            Some(VisualSignalAdapter::new(Arc::new(client)))
        }
        None => {
            warn!("No classifier endpoint configured; image analysis disabled");
            None
        }
    };

    Ok(FusionEngine::new(TextSignalAdapter::new(), visual))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
