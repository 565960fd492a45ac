//! Clip outline geometry
//!
//! Expresses a polygon in percent-of-image coordinates so a rectangular raster
//! placed at `bounds` can be masked to the polygon's shape.

use std::fmt;

use georef_types::{ClipOutline, ClipPoint, GeoPoint, ImageBounds};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::GeorefError;

/// Fewest vertices that enclose an area.
pub const MIN_CLIP_VERTICES: usize = 3;

/// Map every polygon vertex into image percentages, preserving vertex order.
///
/// Inverted bounds are normalized first. Zero or non-finite spans yield
/// [`GeorefError::DegenerateBounds`] before the vertex count is considered.
pub fn compute_clip_outline(
    bounds: &ImageBounds,
    polygon: &[GeoPoint],
) -> Result<ClipOutline, GeorefError> {
    let bounds = bounds.normalized();
    let lat_span = bounds.lat_span();
    let lng_span = bounds.lng_span();

    let degenerate = GeorefError::DegenerateBounds { lat_span, lng_span };
    if lat_span == 0.0 || lng_span == 0.0 || !lat_span.is_finite() || !lng_span.is_finite() {
        return Err(degenerate);
    }

    if polygon.len() < MIN_CLIP_VERTICES {
        return Err(GeorefError::InsufficientPoints {
            needed: MIN_CLIP_VERTICES,
            got: polygon.len(),
        });
    }

    let mut points = Vec::with_capacity(polygon.len());
    for vertex in polygon {
        let x_percent = (vertex.lng - bounds.top_left.lng) / lng_span * 100.0;
        // Image Y grows downward while latitude grows upward
        let y_percent = (bounds.top_left.lat - vertex.lat) / lat_span * 100.0;

        if !x_percent.is_finite() || !y_percent.is_finite() {
            return Err(degenerate);
        }
        points.push(ClipPoint {
            x_percent,
            y_percent,
        });
    }

    Ok(ClipOutline(points))
}

/// What the renderer should apply to the image element.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipPath {
    None,
    Polygon(ClipOutline),
}

impl ClipPath {
    pub fn is_none(&self) -> bool {
        matches!(self, ClipPath::None)
    }
}

impl fmt::Display for ClipPath {
    /// `none`, or `polygon(x1% y1%, x2% y2%, ...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipPath::None => f.write_str("none"),
            ClipPath::Polygon(outline) => {
                f.write_str("polygon(")?;
                for (i, point) in outline.points().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}% {}%", point.x_percent, point.y_percent)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl Serialize for ClipPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Clip path for the current view, or `none` when clipping is off or impossible.
pub fn clip_path(bounds: &ImageBounds, polygon: &[GeoPoint], enabled: bool) -> ClipPath {
    if !enabled {
        return ClipPath::None;
    }
    match compute_clip_outline(bounds, polygon) {
        Ok(outline) => ClipPath::Polygon(outline),
        Err(e) => {
            debug!("Clipping disabled: {}", e);
            ClipPath::None
        }
    }
}
