//! Document analysis: table extraction, projection and advisory bounds

use georef_types::{GeoPoint, ImageBounds, MapMode, Polygon, RawMatch};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::bounds;
use crate::clip::MIN_CLIP_VERTICES;
use crate::error::GeorefError;
use crate::projection::UtmProjection;

/// Outcome of analysing one uploaded plan.
///
/// Warnings never make the analysis fail; they only describe what was
/// degraded (no table, dropped rows, too few vertices for a boundary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAnalysis {
    pub mode: MapMode,
    /// Boundary vertices in document order
    pub coordinates: Polygon,
    /// Advisory image placement derived from the coordinates
    pub bounds: Option<ImageBounds>,
    /// Rows matched in the text layer
    pub matched: usize,
    /// Rows dropped because their coordinates failed projection
    pub dropped: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl PlanAnalysis {
    /// Result for a manually placed plan: no polygon, no derived bounds.
    pub fn manual() -> Self {
        Self {
            mode: MapMode::Manual,
            coordinates: Vec::new(),
            bounds: None,
            matched: 0,
            dropped: 0,
            warnings: Vec::new(),
        }
    }

    pub fn has_polygon(&self) -> bool {
        self.coordinates.len() >= MIN_CLIP_VERTICES
    }
}

/// Record a degrading error as a warning; anything else fails the analysis.
fn degrade(warnings: &mut Vec<String>, err: GeorefError) -> Result<(), GeorefError> {
    if err.is_warning() {
        warnings.push(err.to_string());
        Ok(())
    } else {
        Err(err)
    }
}

/// Project every match, dropping the ones that fail and keeping the rest in order.
///
/// Dropped pairs are returned alongside the points. A failure that is not a
/// per-pair problem aborts the whole projection.
pub fn project_matches(
    matches: &[RawMatch],
    projection: &UtmProjection,
) -> Result<(Vec<GeoPoint>, Vec<GeorefError>), GeorefError> {
    let mut points = Vec::with_capacity(matches.len());
    let mut dropped = Vec::new();

    for m in matches {
        match projection.to_geographic(m.easting, m.northing) {
            Ok(point) => points.push(point),
            Err(e) if e.is_warning() => {
                warn!("Dropping coordinate pair: {}", e);
                dropped.push(e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok((points, dropped))
}

/// Build the analysis for an auto-mode plan from its raw table matches.
pub fn analyze_matches(
    matches: &[RawMatch],
    projection: &UtmProjection,
) -> Result<PlanAnalysis, GeorefError> {
    let mut warnings = Vec::new();

    if matches.is_empty() {
        degrade(&mut warnings, GeorefError::NoCoordinatesFound)?;
    }

    let (coordinates, dropped) = project_matches(matches, projection)?;
    let dropped_count = dropped.len();
    for err in dropped {
        degrade(&mut warnings, err)?;
    }

    if !coordinates.is_empty() && coordinates.len() < MIN_CLIP_VERTICES {
        degrade(
            &mut warnings,
            GeorefError::InsufficientPoints {
                needed: MIN_CLIP_VERTICES,
                got: coordinates.len(),
            },
        )?;
    }

    let bounds = bounds::from_polygon(&coordinates).ok();

    info!(
        matched = matches.len(),
        projected = coordinates.len(),
        dropped = dropped_count,
        "Plan analysed"
    );

    Ok(PlanAnalysis {
        mode: MapMode::Auto,
        coordinates,
        bounds,
        matched: matches.len(),
        dropped: dropped_count,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ZoneConfig;

    fn projection() -> UtmProjection {
        UtmProjection::new(ZoneConfig::default()).unwrap()
    }

    #[test]
    fn test_no_matches_warns() {
        let analysis = analyze_matches(&[], &projection()).unwrap();
        assert!(analysis.coordinates.is_empty());
        assert!(analysis.bounds.is_none());
        assert_eq!(analysis.warnings, vec!["No coordinates found in document"]);
    }

    #[test]
    fn test_invalid_pair_is_dropped_and_rest_kept() {
        let matches = vec![
            RawMatch::new(654396.100, 9744073.130),
            RawMatch::new(54396.100, 9744073.130),
            RawMatch::new(654481.520, 9744158.020),
            RawMatch::new(654498.640, 9744061.400),
        ];
        let analysis = analyze_matches(&matches, &projection()).unwrap();
        assert_eq!(analysis.matched, 4);
        assert_eq!(analysis.dropped, 1);
        assert_eq!(analysis.coordinates.len(), 3);
        assert_eq!(analysis.warnings.len(), 1);
        assert!(analysis.warnings[0].starts_with("Invalid coordinate"));
        assert!(analysis.has_polygon());
        // Document order is kept for the survivors
        assert!(analysis.coordinates[0].lng < analysis.coordinates[1].lng);
    }

    #[test]
    fn test_two_points_warn_but_still_bound() {
        let matches = vec![
            RawMatch::new(654396.100, 9744073.130),
            RawMatch::new(654481.520, 9744158.020),
        ];
        let analysis = analyze_matches(&matches, &projection()).unwrap();
        assert!(!analysis.has_polygon());
        assert!(analysis.bounds.is_some());
        assert!(analysis.warnings[0].starts_with("Insufficient points"));
    }

    #[test]
    fn test_manual_analysis_is_empty() {
        let analysis = PlanAnalysis::manual();
        assert_eq!(analysis.mode, MapMode::Manual);
        assert!(analysis.coordinates.is_empty());
        assert!(!analysis.has_polygon());
    }

    #[test]
    fn test_warnings_omitted_when_empty() {
        let json = serde_json::to_value(PlanAnalysis::manual()).unwrap();
        assert!(json.get("warnings").is_none());
        assert_eq!(json["mode"], "manual");
    }

    #[test]
    fn test_fatal_error_is_not_degraded() {
        let mut warnings = Vec::new();
        let err = GeorefError::Projection("bad zone".into());
        assert_eq!(degrade(&mut warnings, err.clone()), Err(err));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_project_matches_returns_dropped_pairs() {
        let matches = vec![
            RawMatch::new(654396.100, 9744073.130),
            RawMatch::new(654396.100, 500_000.0),
        ];
        let (points, dropped) = project_matches(&matches, &projection()).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(dropped.len(), 1);
        assert!(dropped[0].is_warning());
    }
}
