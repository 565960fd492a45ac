//! Georeferencing pipeline for scanned land-survey plans
//!
//! Text layer -> coordinate table rows -> UTM to WGS84 -> bounds -> clip outline.
//!
//! Every stage is a pure function; the only mutable piece is
//! [`CalibrationState`], which the caller owns per viewing session.

pub mod analysis;
pub mod bounds;
pub mod calibration;
pub mod clip;
pub mod config;
pub mod error;
pub mod extractors;
pub mod maps;
pub mod patterns;
pub mod pdf;
pub mod projection;

use georef_types::{GeoPoint, ImageBounds, MapMode, Polygon, RawMatch, SavedMap};
use tracing::info;

pub use analysis::PlanAnalysis;
pub use calibration::{CalibrationState, Corner, CornerPolicy};
pub use clip::{clip_path, compute_clip_outline, ClipPath};
pub use config::GeorefConfig;
pub use error::GeorefError;
pub use patterns::{TablePattern, TableSchema};
pub use projection::{Hemisphere, UtmProjection, ZoneConfig};

/// Entry point tying the pipeline stages to one configuration.
#[derive(Debug, Clone)]
pub struct GeorefEngine {
    config: GeorefConfig,
    pattern: TablePattern,
}

impl GeorefEngine {
    pub fn new(config: GeorefConfig) -> Result<Self, GeorefError> {
        config.validate()?;
        let pattern = config.table.compile()?;
        Ok(Self { config, pattern })
    }

    pub fn config(&self) -> &GeorefConfig {
        &self.config
    }

    pub fn projection(&self) -> Result<UtmProjection, GeorefError> {
        UtmProjection::new(self.config.zone)
    }

    /// Raw coordinate rows found in `text`, in document order.
    pub fn extract(&self, text: &str) -> Vec<RawMatch> {
        extractors::extract(text, &self.pattern)
    }

    /// Extract, project and bound the coordinate table in `text`.
    pub fn analyze_text(&self, text: &str) -> Result<PlanAnalysis, GeorefError> {
        let projection = self.projection()?;
        let matches = self.extract(text);
        analysis::analyze_matches(&matches, &projection)
    }

    /// Analyse an uploaded PDF. Manual plans skip the text layer entirely.
    pub fn analyze_pdf(&self, pdf_bytes: &[u8], mode: MapMode) -> Result<PlanAnalysis, GeorefError> {
        match mode {
            MapMode::Manual => Ok(PlanAnalysis::manual()),
            MapMode::Auto => {
                let pages = pdf::page_count(pdf_bytes)?;
                let text = pdf::extract_text(pdf_bytes)?;
                info!(pages, text_len = text.len(), "Auto mode: text layer extracted");
                self.analyze_text(&text)
            }
        }
    }

    /// Initial placement: saved rectangle, else polygon bounds, else the default.
    pub fn initial_bounds(&self, saved: Option<ImageBounds>, polygon: &[GeoPoint]) -> ImageBounds {
        bounds::resolve_bounds(saved, polygon, self.config.default_bounds)
    }

    /// Fresh calibration state for a session, seeded like [`Self::initial_bounds`].
    pub fn calibration(&self, saved: Option<ImageBounds>, polygon: &[GeoPoint]) -> CalibrationState {
        CalibrationState::new(
            self.initial_bounds(saved, polygon),
            self.config.calibration.corner_policy,
        )
    }

    pub fn clip_path(&self, bounds: &ImageBounds, polygon: &[GeoPoint], enabled: bool) -> ClipPath {
        clip::clip_path(bounds, polygon, enabled)
    }

    pub fn saved_map(
        &self,
        name: &str,
        image_path: &str,
        bounds: ImageBounds,
        coordinates: Polygon,
        mode: MapMode,
    ) -> Result<SavedMap, GeorefError> {
        maps::build_saved_map(name, image_path, bounds, coordinates, mode)
    }
}

impl Default for GeorefEngine {
    fn default() -> Self {
        Self {
            config: GeorefConfig::default(),
            pattern: TablePattern::survey_default(),
        }
    }
}
