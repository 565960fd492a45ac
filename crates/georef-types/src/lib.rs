//! Shared data model for the survey georeferencing pipeline
//!
//! Every value here is plain data: points, rectangles and outlines are
//! recomputed from scratch on each input change and carry no identity.

pub mod types;

pub use types::{
    ClipOutline, ClipPoint, GeoPoint, ImageBounds, MapMode, Polygon, RawMatch, SavedMap,
};
