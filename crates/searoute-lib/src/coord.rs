//! Geographic coordinates, validation and great-circle distances.

use std::fmt;

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A `(longitude, latitude)` pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Great-circle distance to `other` in kilometres (mean Earth radius).
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        Haversine.distance(self.to_point(), other.to_point()) / 1000.0
    }

    /// GeoJSON position (`[lon, lat]`).
    pub fn to_position(&self) -> Vec<f64> {
        vec![self.lon, self.lat]
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    /// Unit vector on the sphere. Chord length between two of these grows
    /// monotonically with great-circle distance.
    pub(crate) fn unit_vector(&self) -> [f64; 3] {
        let lon = self.lon.to_radians();
        let lat = self.lat.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }

    /// Hashable identity of the coordinate value. `-0.0` and `0.0` map to the
    /// same key.
    pub(crate) fn key(&self) -> (u64, u64) {
        (
            normalize_zero(self.lon).to_bits(),
            normalize_zero(self.lat).to_bits(),
        )
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lon, self.lat)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self::new(lon, lat)
    }
}

/// Reject coordinates that are not finite or fall outside
/// lon ∈ [-180, 180], lat ∈ [-90, 90].
pub fn validate(coordinate: &Coordinate) -> Result<()> {
    check(coordinate, None)
}

/// Like [`validate`], attaching the waypoint index to the error.
pub(crate) fn validate_waypoint(coordinate: &Coordinate, index: usize) -> Result<()> {
    check(coordinate, Some(index))
}

fn check(coordinate: &Coordinate, waypoint: Option<usize>) -> Result<()> {
    let reason = if !coordinate.lon.is_finite() || !coordinate.lat.is_finite() {
        "longitude and latitude must be finite numbers"
    } else if !(-180.0..=180.0).contains(&coordinate.lon) {
        "longitude must be within [-180, 180]"
    } else if !(-90.0..=90.0).contains(&coordinate.lat) {
        "latitude must be within [-90, 90]"
    } else {
        return Ok(());
    };

    Err(Error::InvalidCoordinate {
        coordinate: *coordinate,
        waypoint,
        reason,
    })
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}
