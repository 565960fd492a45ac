//! Saved-map records handed to the persistence layer

use georef_types::{ImageBounds, MapMode, Polygon, SavedMap};

use crate::error::GeorefError;

/// Assemble a [`SavedMap`] from the current view.
///
/// Manual maps never carry a polygon. Bounds are stored normalized.
pub fn build_saved_map(
    name: &str,
    image_path: &str,
    bounds: ImageBounds,
    coordinates: Polygon,
    mode: MapMode,
) -> Result<SavedMap, GeorefError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GeorefError::InvalidMap("name must not be empty".into()));
    }
    if image_path.trim().is_empty() {
        return Err(GeorefError::InvalidMap("image path must not be empty".into()));
    }
    if !bounds.top_left.is_finite() || !bounds.bottom_right.is_finite() {
        return Err(GeorefError::InvalidMap("bounds must be finite".into()));
    }
    if coordinates.iter().any(|p| !p.is_finite()) {
        return Err(GeorefError::InvalidMap("coordinates must be finite".into()));
    }

    let coordinates = match mode {
        MapMode::Manual => Vec::new(),
        MapMode::Auto => coordinates,
    };

    Ok(SavedMap {
        name: name.to_string(),
        image_path: image_path.to_string(),
        bounds: bounds.normalized(),
        coordinates,
        mode,
    })
}
