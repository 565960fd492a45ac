//! Manual calibration of an image's placement by dragging its two corners

use georef_types::{GeoPoint, ImageBounds};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GeorefError;

/// What to do when a corner move would swap the corners on an axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerPolicy {
    /// Recompute both corners as true min/max after every move.
    #[default]
    Normalize,
    /// Refuse the move and keep the previous placement.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Corner {
    TopLeft,
    BottomRight,
}

/// The current image placement for one viewing session.
///
/// Owned by the session that displays it; never shared.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationState {
    bounds: ImageBounds,
    policy: CornerPolicy,
}

impl CalibrationState {
    pub fn new(initial: ImageBounds, policy: CornerPolicy) -> Self {
        Self {
            bounds: initial.normalized(),
            policy,
        }
    }

    pub fn bounds(&self) -> ImageBounds {
        self.bounds
    }

    pub fn policy(&self) -> CornerPolicy {
        self.policy
    }

    /// Replace both corners at once (new upload or a loaded saved map).
    pub fn reset(&mut self, bounds: ImageBounds) -> ImageBounds {
        self.bounds = bounds.normalized();
        self.bounds
    }

    pub fn move_top_left(&mut self, point: GeoPoint) -> Result<ImageBounds, GeorefError> {
        self.move_corner(Corner::TopLeft, point)
    }

    pub fn move_bottom_right(&mut self, point: GeoPoint) -> Result<ImageBounds, GeorefError> {
        self.move_corner(Corner::BottomRight, point)
    }

    /// Relocate one corner, leaving the other untouched unless the move
    /// inverts the rectangle and the policy is [`CornerPolicy::Normalize`].
    pub fn move_corner(
        &mut self,
        corner: Corner,
        point: GeoPoint,
    ) -> Result<ImageBounds, GeorefError> {
        if !point.is_finite() {
            return Err(GeorefError::InvalidCoordinate {
                x: point.lng,
                y: point.lat,
                reason: "non-finite corner".into(),
            });
        }

        let mut candidate = self.bounds;
        match corner {
            Corner::TopLeft => candidate.top_left = point,
            Corner::BottomRight => candidate.bottom_right = point,
        }

        if candidate.is_inverted() {
            match self.policy {
                CornerPolicy::Normalize => {
                    debug!(?corner, "Corner move inverted bounds, normalizing");
                    candidate = candidate.normalized();
                }
                CornerPolicy::Reject => return Err(GeorefError::InvertedBounds),
            }
        }

        self.bounds = candidate;
        Ok(self.bounds)
    }
}
