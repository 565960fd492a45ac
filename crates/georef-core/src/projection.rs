//! UTM <-> WGS84 geographic conversion
//!
//! The projected coordinate system is always passed in explicitly as a
//! [`ZoneConfig`]; nothing here reads global state.

use georef_types::GeoPoint;
use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use serde::{Deserialize, Serialize};

use crate::error::GeorefError;

const WGS84_GEOGRAPHIC: &str = "+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs";

/// Plausible UTM easting range in meters, generous on both sides of the zone.
const EASTING_RANGE: (f64, f64) = (100_000.0, 900_000.0);
/// Equator up to the central-meridian northing of 84°N (9 328 094 m), rounded inward.
const NORTHING_RANGE_NORTH: (f64, f64) = (0.0, 9_320_000.0);
/// Central-meridian northing of 80°S (1 118 414 m), rounded inward, up to the equator.
const NORTHING_RANGE_SOUTH: (f64, f64) = (1_120_000.0, 10_000_000.0);

/// Latitude limits of UTM coverage in each hemisphere.
const LATITUDE_BAND_NORTH: (f64, f64) = (0.0, 84.0);
const LATITUDE_BAND_SOUTH: (f64, f64) = (-80.0, 0.0);

/// Float noise allowed when an inverse transform lands on a range edge.
const PROJECTED_SLACK_M: f64 = 1e-3;
const GEOGRAPHIC_SLACK_DEG: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    North,
    South,
}

/// A single UTM zone on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub zone: u8,
    pub hemisphere: Hemisphere,
}

impl Default for ZoneConfig {
    /// UTM 17S, the zone the survey plans were drawn in.
    fn default() -> Self {
        Self {
            zone: 17,
            hemisphere: Hemisphere::South,
        }
    }
}

impl ZoneConfig {
    pub fn utm(zone: u8, hemisphere: Hemisphere) -> Result<Self, GeorefError> {
        let config = Self { zone, hemisphere };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GeorefError> {
        if !(1..=60).contains(&self.zone) {
            return Err(GeorefError::Config(format!(
                "UTM zone must be between 1 and 60, got {}",
                self.zone
            )));
        }
        Ok(())
    }

    /// Longitude of the zone's central meridian in degrees.
    pub fn central_meridian(&self) -> f64 {
        f64::from(self.zone) * 6.0 - 183.0
    }

    pub fn epsg(&self) -> u32 {
        match self.hemisphere {
            Hemisphere::North => 32600 + u32::from(self.zone),
            Hemisphere::South => 32700 + u32::from(self.zone),
        }
    }

    pub fn proj_string(&self) -> String {
        let south = match self.hemisphere {
            Hemisphere::North => "",
            Hemisphere::South => " +south",
        };
        format!(
            "+proj=utm +zone={}{} +ellps=WGS84 +datum=WGS84 +units=m +no_defs",
            self.zone, south
        )
    }

    fn northing_range(&self) -> (f64, f64) {
        match self.hemisphere {
            Hemisphere::North => NORTHING_RANGE_NORTH,
            Hemisphere::South => NORTHING_RANGE_SOUTH,
        }
    }

    fn latitude_band(&self) -> (f64, f64) {
        match self.hemisphere {
            Hemisphere::North => LATITUDE_BAND_NORTH,
            Hemisphere::South => LATITUDE_BAND_SOUTH,
        }
    }

    /// Check that an easting/northing pair can belong to this zone.
    ///
    /// Every accepted pair converts to a point that [`Self::check_geographic`]
    /// accepts: off the central meridian a northing maps to a latitude closer
    /// to the equator than on it.
    pub fn check_projected(&self, easting: f64, northing: f64) -> Result<(), GeorefError> {
        self.check_projected_within(easting, northing, 0.0)
    }

    fn check_projected_within(
        &self,
        easting: f64,
        northing: f64,
        slack: f64,
    ) -> Result<(), GeorefError> {
        let invalid = |reason: String| GeorefError::InvalidCoordinate {
            x: easting,
            y: northing,
            reason,
        };

        if !easting.is_finite() || !northing.is_finite() {
            return Err(invalid("non-finite value".into()));
        }
        if easting < EASTING_RANGE.0 - slack || easting > EASTING_RANGE.1 + slack {
            return Err(invalid(format!(
                "easting outside {}..{}",
                EASTING_RANGE.0, EASTING_RANGE.1
            )));
        }
        let (min_n, max_n) = self.northing_range();
        if northing < min_n - slack || northing > max_n + slack {
            return Err(invalid(format!(
                "northing outside {}..{} for EPSG:{}",
                min_n,
                max_n,
                self.epsg()
            )));
        }
        Ok(())
    }

    /// Check that a geographic point lies in this zone's hemisphere and within
    /// the transverse Mercator's usable half-plane.
    pub fn check_geographic(&self, point: GeoPoint) -> Result<(), GeorefError> {
        let invalid = |reason: &str| GeorefError::InvalidCoordinate {
            x: point.lng,
            y: point.lat,
            reason: reason.to_string(),
        };

        if !point.is_finite() {
            return Err(invalid("non-finite value"));
        }
        let (min_lat, max_lat) = self.latitude_band();
        if point.lat < min_lat - GEOGRAPHIC_SLACK_DEG || point.lat > max_lat + GEOGRAPHIC_SLACK_DEG {
            return Err(invalid("latitude outside zone hemisphere"));
        }
        if !(-180.0..=180.0).contains(&point.lng)
            || (point.lng - self.central_meridian()).abs() >= 90.0
        {
            return Err(invalid("longitude too far from central meridian"));
        }
        Ok(())
    }
}

/// Reusable transformer between one UTM zone and WGS84 lat/lng.
pub struct UtmProjection {
    zone: ZoneConfig,
    utm: Proj,
    geographic: Proj,
}

impl std::fmt::Debug for UtmProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UtmProjection")
            .field("zone", &self.zone)
            .field("epsg", &self.zone.epsg())
            .finish_non_exhaustive()
    }
}

impl UtmProjection {
    pub fn new(zone: ZoneConfig) -> Result<Self, GeorefError> {
        zone.validate()?;

        let utm = Proj::from_proj_string(&zone.proj_string()).map_err(|e| {
            GeorefError::Projection(format!("Invalid UTM projection EPSG:{}: {e:?}", zone.epsg()))
        })?;
        let geographic = Proj::from_proj_string(WGS84_GEOGRAPHIC)
            .map_err(|e| GeorefError::Projection(format!("Invalid WGS84 projection: {e:?}")))?;

        Ok(Self {
            zone,
            utm,
            geographic,
        })
    }

    pub fn zone(&self) -> ZoneConfig {
        self.zone
    }

    /// Easting/northing in meters to latitude/longitude in degrees.
    pub fn to_geographic(&self, easting: f64, northing: f64) -> Result<GeoPoint, GeorefError> {
        self.zone.check_projected(easting, northing)?;

        let mut point = (easting, northing, 0.0);
        transform(&self.utm, &self.geographic, &mut point).map_err(|e| {
            GeorefError::InvalidCoordinate {
                x: easting,
                y: northing,
                reason: format!("transform failed: {e:?}"),
            }
        })?;

        // proj4rs works in radians for geographic systems
        let geo = GeoPoint::new(point.1.to_degrees(), point.0.to_degrees());
        if !geo.is_finite() {
            return Err(GeorefError::InvalidCoordinate {
                x: easting,
                y: northing,
                reason: "transform produced a non-finite point".into(),
            });
        }
        Ok(geo)
    }

    /// Latitude/longitude in degrees back to easting/northing in meters.
    pub fn to_projected(&self, point: GeoPoint) -> Result<(f64, f64), GeorefError> {
        self.zone.check_geographic(point)?;

        let mut xyz = (point.lng.to_radians(), point.lat.to_radians(), 0.0);
        transform(&self.geographic, &self.utm, &mut xyz).map_err(|e| {
            GeorefError::InvalidCoordinate {
                x: point.lng,
                y: point.lat,
                reason: format!("transform failed: {e:?}"),
            }
        })?;

        self.zone
            .check_projected_within(xyz.0, xyz.1, PROJECTED_SLACK_M)?;
        Ok((xyz.0, xyz.1))
    }
}

/// One-shot conversion; prefer [`UtmProjection`] when converting many points.
pub fn to_geographic(
    easting: f64,
    northing: f64,
    zone: &ZoneConfig,
) -> Result<GeoPoint, GeorefError> {
    UtmProjection::new(*zone)?.to_geographic(easting, northing)
}

/// One-shot inverse of [`to_geographic`].
pub fn to_projected(point: GeoPoint, zone: &ZoneConfig) -> Result<(f64, f64), GeorefError> {
    UtmProjection::new(*zone)?.to_projected(point)
}
