//! Distance units, path length and travel duration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;
use crate::error::{Error, Result};

/// Kilometres in one nautical mile.
pub const KM_PER_NAUTICAL_MILE: f64 = 1.852;

/// Kilometres in one statute mile.
pub const KM_PER_MILE: f64 = 1.609_344;

/// Distance unit used for route lengths. Speeds are expressed in the matching
/// per-hour unit (knots for nautical miles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[default]
    #[serde(rename = "naut")]
    NauticalMiles,
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "mi")]
    Miles,
}

impl DistanceUnit {
    /// Short identifier used in output properties.
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceUnit::NauticalMiles => "naut",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }

    /// Label used when printing a distance.
    pub fn label(self) -> &'static str {
        match self {
            DistanceUnit::NauticalMiles => "n.miles",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "miles",
        }
    }

    /// Label of the natural speed measure for this unit.
    pub fn speed_label(self) -> &'static str {
        match self {
            DistanceUnit::NauticalMiles => "knots",
            DistanceUnit::Kilometers => "km/h",
            DistanceUnit::Miles => "mph",
        }
    }

    /// Convert a length in kilometres into this unit.
    pub fn from_km(self, km: f64) -> f64 {
        match self {
            DistanceUnit::NauticalMiles => km / KM_PER_NAUTICAL_MILE,
            DistanceUnit::Kilometers => km,
            DistanceUnit::Miles => km / KM_PER_MILE,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naut" | "nm" | "nmi" | "nautical" => Ok(DistanceUnit::NauticalMiles),
            "km" | "kilometers" | "kilometres" => Ok(DistanceUnit::Kilometers),
            "mi" | "miles" => Ok(DistanceUnit::Miles),
            other => Err(format!("unknown unit '{other}': use naut, km or mi")),
        }
    }
}

/// Sum of great-circle distances between consecutive coordinates, in `unit`.
/// Empty and single-point paths have zero length.
pub fn path_length(coordinates: &[Coordinate], unit: DistanceUnit) -> f64 {
    let km: f64 = coordinates
        .windows(2)
        .map(|pair| pair[0].distance_km(&pair[1]))
        .sum();
    unit.from_km(km)
}

/// Travel time in hours for `length` at `speed` (both in the same unit
/// system).
pub fn duration_hours(speed: f64, length: f64) -> Result<f64> {
    validate_speed(speed)?;
    if length == 0.0 {
        return Ok(0.0);
    }
    Ok(length / speed)
}

/// Speed must be finite and strictly positive.
pub fn validate_speed(speed: f64) -> Result<()> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidSpeed { speed })
    }
}
