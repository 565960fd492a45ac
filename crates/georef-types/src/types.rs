use serde::{Deserialize, Serialize};

/// A projected coordinate pair read straight from a survey table row.
///
/// No semantic validation has happened yet; the projection step decides
/// whether the pair is usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawMatch {
    pub easting: f64,
    pub northing: f64,
}

impl RawMatch {
    pub fn new(easting: f64, northing: f64) -> Self {
        Self { easting, northing }
    }
}

/// Geographic coordinate in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Boundary vertices in winding order. Order is preserved end to end.
pub type Polygon = Vec<GeoPoint>;

/// Geographic placement of a raster image, anchored by two opposite corners.
///
/// The conventional orientation is `top_left.lat >= bottom_right.lat` and
/// `top_left.lng <= bottom_right.lng`; all span math assumes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBounds {
    pub top_left: GeoPoint,
    pub bottom_right: GeoPoint,
}

impl ImageBounds {
    pub fn new(top_left: GeoPoint, bottom_right: GeoPoint) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Build from south/west/north/east edges.
    pub fn from_edges(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            top_left: GeoPoint::new(north, west),
            bottom_right: GeoPoint::new(south, east),
        }
    }

    pub fn lat_span(&self) -> f64 {
        self.top_left.lat - self.bottom_right.lat
    }

    pub fn lng_span(&self) -> f64 {
        self.bottom_right.lng - self.top_left.lng
    }

    pub fn north(&self) -> f64 {
        self.top_left.lat.max(self.bottom_right.lat)
    }

    pub fn south(&self) -> f64 {
        self.top_left.lat.min(self.bottom_right.lat)
    }

    pub fn west(&self) -> f64 {
        self.top_left.lng.min(self.bottom_right.lng)
    }

    pub fn east(&self) -> f64 {
        self.top_left.lng.max(self.bottom_right.lng)
    }

    /// True when either span is zero, i.e. the rectangle has no area.
    pub fn is_degenerate(&self) -> bool {
        self.lat_span() == 0.0 || self.lng_span() == 0.0
    }

    /// True when the corners are swapped on at least one axis.
    pub fn is_inverted(&self) -> bool {
        self.lat_span() < 0.0 || self.lng_span() < 0.0
    }

    /// Recompute the corners as true min/max so the orientation invariant holds.
    pub fn normalized(&self) -> Self {
        Self::from_edges(self.south(), self.west(), self.north(), self.east())
    }
}

/// One vertex of a clip outline, in percent of the image width/height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipPoint {
    pub x_percent: f64,
    pub y_percent: f64,
}

/// Polygon outline in image space, one point per polygon vertex, same order.
///
/// Values are nominally in `[0, 100]` but may fall outside when the polygon
/// extends past the image rectangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipOutline(pub Vec<ClipPoint>);

impl ClipOutline {
    pub fn points(&self) -> &[ClipPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How a plan was placed on the map.
///
/// `Auto` means the polygon came from the document's coordinate table;
/// `Manual` means the rectangle was set purely by calibration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapMode {
    #[default]
    Manual,
    Auto,
}

impl MapMode {
    /// Read a mode from a loosely typed form value. Anything other than
    /// `auto` falls back to `Manual`.
    pub fn from_form(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "auto" => MapMode::Auto,
            _ => MapMode::Manual,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MapMode::Manual => "manual",
            MapMode::Auto => "auto",
        }
    }
}

/// Record handed to the persistence collaborator. This crate never stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMap {
    pub name: String,
    pub image_path: String,
    pub bounds: ImageBounds,
    #[serde(default)]
    pub coordinates: Polygon,
    pub mode: MapMode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_bounds_spans_follow_orientation() {
        let bounds = ImageBounds::new(GeoPoint::new(-2.18, -79.90), GeoPoint::new(-2.20, -79.88));
        assert!((bounds.lat_span() - 0.02).abs() < 1e-12);
        assert!((bounds.lng_span() - 0.02).abs() < 1e-12);
        assert!(!bounds.is_inverted());
        assert!(!bounds.is_degenerate());
    }

    #[test]
    fn test_normalized_fixes_swapped_corners() {
        let inverted =
            ImageBounds::new(GeoPoint::new(-2.20, -79.88), GeoPoint::new(-2.18, -79.90));
        assert!(inverted.is_inverted());

        let fixed = inverted.normalized();
        assert_eq!(fixed.top_left, GeoPoint::new(-2.18, -79.90));
        assert_eq!(fixed.bottom_right, GeoPoint::new(-2.20, -79.88));
    }

    #[test]
    fn test_zero_span_is_degenerate() {
        let point = GeoPoint::new(-2.0, -80.0);
        assert!(ImageBounds::new(point, point).is_degenerate());
    }

    #[test]
    fn test_bounds_serialize_camel_case() {
        let bounds = ImageBounds::from_edges(-2.2, -79.9, -2.1, -79.8);
        let json = serde_json::to_value(bounds).unwrap();
        assert_eq!(json["topLeft"]["lat"], -2.1);
        assert_eq!(json["bottomRight"]["lng"], -79.8);
    }

    #[test]
    fn test_clip_outline_serializes_as_array() {
        let outline = ClipOutline(vec![ClipPoint {
            x_percent: 10.0,
            y_percent: 20.0,
        }]);
        let json = serde_json::to_string(&outline).unwrap();
        assert_eq!(json, r#"[{"xPercent":10.0,"yPercent":20.0}]"#);
    }

    #[test]
    fn test_map_mode_from_form() {
        assert_eq!(MapMode::from_form(Some("auto")), MapMode::Auto);
        assert_eq!(MapMode::from_form(Some(" AUTO ")), MapMode::Auto);
        assert_eq!(MapMode::from_form(Some("manual")), MapMode::Manual);
        assert_eq!(MapMode::from_form(Some("something")), MapMode::Manual);
        assert_eq!(MapMode::from_form(None), MapMode::Manual);
    }

    #[test]
    fn test_saved_map_defaults_missing_coordinates() {
        let json = r#"{
            "name": "Lote 4",
            "imagePath": "/uploads/1.pdf",
            "bounds": {"topLeft": {"lat": -2.18, "lng": -79.9}, "bottomRight": {"lat": -2.2, "lng": -79.88}},
            "mode": "manual"
        }"#;
        let map: SavedMap = serde_json::from_str(json).unwrap();
        assert!(map.coordinates.is_empty());
        assert_eq!(map.mode, MapMode::Manual);
    }

    fn any_bounds() -> impl Strategy<Value = ImageBounds> {
        (-89.0f64..89.0, -179.0f64..179.0, -89.0f64..89.0, -179.0f64..179.0).prop_map(
            |(lat_a, lng_a, lat_b, lng_b)| {
                ImageBounds::new(GeoPoint::new(lat_a, lng_a), GeoPoint::new(lat_b, lng_b))
            },
        )
    }

    proptest! {
        #[test]
        fn normalized_is_never_inverted_and_idempotent(bounds in any_bounds()) {
            let once = bounds.normalized();
            prop_assert!(!once.is_inverted());
            prop_assert_eq!(once.normalized(), once);
            prop_assert_eq!(once.north(), bounds.north());
            prop_assert_eq!(once.west(), bounds.west());
        }
    }
}
