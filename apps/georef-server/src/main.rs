//! Survey plan georeferencing server
//!
//! Exposes the georeferencing pipeline to the map UI and the persistence
//! layer over a small JSON API:
//!
//! - Plan upload and coordinate table analysis
//! - Clip path computation for the image overlay
//! - Corner calibration of the image placement
//! - Saved-map record assembly
//!
//! The server keeps no session state. Calibration state lives in the client
//! and is sent along with every corner move.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use georef_core::{GeorefConfig, GeorefEngine};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;

use api::{
    handle_calibration, handle_clip_path, handle_config, handle_extract, handle_health,
    handle_save_map, handle_upload,
};

/// Command-line arguments for the georeferencing server
#[derive(Parser, Debug)]
#[command(name = "georef-server")]
#[command(about = "Georeferencing server for scanned survey plans")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3005")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// TOML configuration file (zone, table pattern, default bounds)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory where uploaded plans are stored
    #[arg(long, default_value = "uploads")]
    uploads_dir: PathBuf,

    /// Maximum upload size in megabytes
    #[arg(long, default_value = "25")]
    max_upload_mb: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<GeorefEngine>,
    pub uploads_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(engine: GeorefEngine, uploads_dir: PathBuf) -> Self {
        Self {
            engine: Arc::new(engine),
            uploads_dir: Arc::new(uploads_dir),
        }
    }
}

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let uploads = ServeDir::new(state.uploads_dir.as_path());

    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // API endpoints
        .route("/api/config", get(handle_config))
        .route(
            "/api/upload",
            post(handle_upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/extract", post(handle_extract))
        .route("/api/clip-path", post(handle_clip_path))
        .route("/api/calibration", post(handle_calibration))
        .route("/api/maps", post(handle_save_map))
        // Stored plans
        .nest_service("/uploads", uploads)
        // Apply middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &args.config {
        Some(path) => GeorefConfig::from_file(path)?,
        None => GeorefConfig::default(),
    };
    info!(
        "Projection: UTM zone {} ({:?}), EPSG:{}",
        config.zone.zone,
        config.zone.hemisphere,
        config.zone.epsg()
    );

    let engine = GeorefEngine::new(config).context("Invalid georeferencing configuration")?;

    tokio::fs::create_dir_all(&args.uploads_dir)
        .await
        .with_context(|| format!("Failed to create {}", args.uploads_dir.display()))?;

    let state = AppState::new(engine, args.uploads_dir.clone());
    let app = build_router(state, args.max_upload_mb * 1024 * 1024);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Uploads stored in {}", args.uploads_dir.display());
    info!("Upload limit: {}MB", args.max_upload_mb);

    axum::serve(listener, app).await?;

    Ok(())
}
