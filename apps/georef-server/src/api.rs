//! API handlers for the georeferencing server
//!
//! Provides REST endpoints for:
//! - Plan upload and analysis
//! - Clip path computation
//! - Corner calibration
//! - Saved-map assembly

use axum::{
    extract::{Multipart, State},
    Json,
};
use georef_core::{
    CalibrationState, ClipPath, Corner, CornerPolicy, GeorefError, PlanAnalysis, ZoneConfig,
};
use georef_types::{GeoPoint, ImageBounds, MapMode, Polygon, SavedMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ServerError;
use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "georef-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Active projection and placement defaults
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub zone: ZoneConfig,
    pub epsg: u32,
    pub default_bounds: ImageBounds,
    pub corner_policy: CornerPolicy,
}

/// Handler: GET /api/config
pub async fn handle_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let config = state.engine.config();
    Json(ConfigResponse {
        zone: config.zone,
        epsg: config.zone.epsg(),
        default_bounds: config.default_bounds,
        corner_policy: config.calibration.corner_policy,
    })
}

/// Upload response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Public path of the stored plan
    pub path: String,
    pub mode: MapMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coordinates: Polygon,
    /// Initial image placement (polygon bounds or the configured default)
    pub bounds: ImageBounds,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Handler: POST /api/upload
///
/// Multipart fields: `plan` (the PDF) and optional `mode` (`manual`|`auto`).
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ServerError> {
    let mut plan: Option<Vec<u8>> = None;
    let mut mode_field: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidRequest(format!("Malformed upload: {}", e)))?
    {
        match field.name() {
            Some("plan") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::InvalidRequest(format!("Malformed upload: {}", e)))?;
                plan = Some(bytes.to_vec());
            }
            Some("mode") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::InvalidRequest(format!("Malformed upload: {}", e)))?;
                mode_field = Some(text);
            }
            other => debug!("Ignoring upload field {:?}", other),
        }
    }

    let plan = plan
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| ServerError::InvalidRequest("No file uploaded".into()))?;
    let mode = MapMode::from_form(mode_field.as_deref());

    // Nothing is stored for a plan that fails analysis
    let engine = state.engine.clone();
    let (plan, analysis) = tokio::task::spawn_blocking(move || {
        let analysis = engine.analyze_pdf(&plan, mode)?;
        Ok::<_, GeorefError>((plan, analysis))
    })
    .await
    .map_err(|e| ServerError::Internal(format!("Analysis task failed: {}", e)))??;

    let file_name = format!("{}.pdf", uuid::Uuid::new_v4());
    let stored = state.uploads_dir.join(&file_name);
    tokio::fs::write(&stored, &plan)
        .await
        .map_err(|e| ServerError::Internal(format!("Failed to store upload: {}", e)))?;
    info!(
        "Stored plan {} ({} bytes, mode={})",
        stored.display(),
        plan.len(),
        mode.as_str()
    );

    let bounds = state.engine.initial_bounds(None, &analysis.coordinates);

    Ok(Json(UploadResponse {
        path: format!("/uploads/{}", file_name),
        mode: analysis.mode,
        coordinates: analysis.coordinates,
        bounds,
        warnings: analysis.warnings,
    }))
}

/// Extract request body
#[derive(Deserialize)]
pub struct ExtractRequest {
    /// Text layer of the plan
    pub text: String,
}

/// Handler: POST /api/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<PlanAnalysis>, ServerError> {
    debug!("Extract request: {} chars", req.text.len());
    let analysis = state.engine.analyze_text(&req.text)?;
    Ok(Json(analysis))
}

/// Clip path request body
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipPathRequest {
    pub bounds: ImageBounds,
    #[serde(default)]
    pub coordinates: Polygon,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Clip path response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipPathResponse {
    /// `none` or a `polygon(...)` expression
    pub clip_path: ClipPath,
}

/// Handler: POST /api/clip-path
pub async fn handle_clip_path(
    State(state): State<AppState>,
    Json(req): Json<ClipPathRequest>,
) -> Json<ClipPathResponse> {
    let clip_path = state
        .engine
        .clip_path(&req.bounds, &req.coordinates, req.enabled);
    Json(ClipPathResponse { clip_path })
}

/// Calibration request body
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationRequest {
    /// Current placement held by the client
    pub bounds: ImageBounds,
    pub corner: Corner,
    pub point: GeoPoint,
}

/// Calibration response
#[derive(Debug, Serialize, Deserialize)]
pub struct CalibrationResponse {
    pub bounds: ImageBounds,
}

/// Handler: POST /api/calibration
pub async fn handle_calibration(
    State(state): State<AppState>,
    Json(req): Json<CalibrationRequest>,
) -> Result<Json<CalibrationResponse>, ServerError> {
    let policy = state.engine.config().calibration.corner_policy;
    let mut calibration = CalibrationState::new(req.bounds, policy);
    let bounds = calibration.move_corner(req.corner, req.point)?;
    debug!("Moved {:?} to {:?}", req.corner, req.point);
    Ok(Json(CalibrationResponse { bounds }))
}

/// Save map request body
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMapRequest {
    pub name: String,
    pub image_path: String,
    pub bounds: ImageBounds,
    #[serde(default)]
    pub coordinates: Polygon,
    #[serde(default)]
    pub mode: MapMode,
}

/// Handler: POST /api/maps
///
/// Validates and normalizes the record; storing it is the persistence layer's job.
pub async fn handle_save_map(
    State(state): State<AppState>,
    Json(req): Json<SaveMapRequest>,
) -> Result<Json<SavedMap>, ServerError> {
    let map = state.engine.saved_map(
        &req.name,
        &req.image_path,
        req.bounds,
        req.coordinates,
        req.mode,
    )?;
    info!("Prepared saved map '{}' ({})", map.name, map.mode.as_str());
    Ok(Json(map))
}
