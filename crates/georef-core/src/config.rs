//! Configuration for the georeferencing pipeline
//!
//! Loaded from TOML. Every section has defaults matching the survey plans the
//! pipeline was built for, so an empty file is a valid configuration.

use anyhow::Context;
use georef_types::{GeoPoint, ImageBounds};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::calibration::CornerPolicy;
use crate::error::GeorefError;
use crate::patterns::TableSchema;
use crate::projection::ZoneConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeorefConfig {
    /// Projected coordinate system of the survey tables
    pub zone: ZoneConfig,
    /// Shape of a coordinate table row
    pub table: TableSchema,
    /// Image placement used before a polygon or saved rectangle is known
    pub default_bounds: ImageBounds,
    pub calibration: CalibrationConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub corner_policy: CornerPolicy,
}

impl Default for GeorefConfig {
    fn default() -> Self {
        Self {
            zone: ZoneConfig::default(),
            table: TableSchema::default(),
            // Guayaquil area
            default_bounds: ImageBounds::new(
                GeoPoint::new(-2.18, -79.90),
                GeoPoint::new(-2.20, -79.88),
            ),
            calibration: CalibrationConfig::default(),
        }
    }
}

impl GeorefConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed, or
    /// the values fail [`GeorefConfig::validate`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string
    ///
    /// ```
    /// use georef_core::GeorefConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = GeorefConfig::from_toml(r#"
    ///     [zone]
    ///     zone = 18
    ///     hemisphere = "north"
    /// "#)?;
    /// assert_eq!(config.zone.zone, 18);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        let config: GeorefConfig = toml::from_str(s).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn validate(&self) -> Result<(), GeorefError> {
        self.zone.validate()?;
        self.table.compile()?;

        let bounds = &self.default_bounds;
        if !bounds.top_left.is_finite() || !bounds.bottom_right.is_finite() {
            return Err(GeorefError::Config(
                "default_bounds must be finite".into(),
            ));
        }
        if bounds.is_degenerate() {
            return Err(GeorefError::Config(
                "default_bounds must have a non-zero span".into(),
            ));
        }
        Ok(())
    }
}
