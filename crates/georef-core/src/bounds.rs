//! Axis-aligned bounds for a set of geographic points

use georef_types::{GeoPoint, ImageBounds};
use tracing::debug;

use crate::error::GeorefError;

/// Fewest points that can span a rectangle.
pub const MIN_BOUNDS_POINTS: usize = 2;

/// Smallest rectangle covering every vertex, oriented top-left/bottom-right.
pub fn from_polygon(polygon: &[GeoPoint]) -> Result<ImageBounds, GeorefError> {
    if polygon.len() < MIN_BOUNDS_POINTS {
        return Err(GeorefError::InsufficientPoints {
            needed: MIN_BOUNDS_POINTS,
            got: polygon.len(),
        });
    }

    let (mut south, mut west) = (f64::INFINITY, f64::INFINITY);
    let (mut north, mut east) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for point in polygon {
        south = south.min(point.lat);
        north = north.max(point.lat);
        west = west.min(point.lng);
        east = east.max(point.lng);
    }

    Ok(ImageBounds::from_edges(south, west, north, east))
}

/// Pick the initial image placement.
///
/// A previously saved rectangle wins, then the polygon's bounds, then `fallback`.
pub fn resolve_bounds(
    saved: Option<ImageBounds>,
    polygon: &[GeoPoint],
    fallback: ImageBounds,
) -> ImageBounds {
    if let Some(saved) = saved {
        return saved;
    }
    match from_polygon(polygon) {
        Ok(bounds) => bounds,
        Err(e) => {
            debug!("Using default image bounds: {}", e);
            fallback
        }
    }
}
