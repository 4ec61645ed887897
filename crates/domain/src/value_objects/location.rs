//! Location value object
//!
//! A [`Coordinate`] together with the metadata a provider attaches to a fix.
//! Locations are immutable: a newer fix replaces the previous value instead
//! of mutating it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Coordinate;

/// Mean earth radius in meters (IUGG)
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A position fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    coordinate: Coordinate,
    /// When the fix was taken, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
    /// Radius of uncertainty in meters, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    horizontal_accuracy: Option<f64>,
}

impl Location {
    /// Create a location without metadata
    #[must_use]
    pub const fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            timestamp: None,
            horizontal_accuracy: None,
        }
    }

    /// Attach the time the fix was taken
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attach the accuracy radius in meters
    #[must_use]
    pub const fn with_horizontal_accuracy(mut self, meters: f64) -> Self {
        self.horizontal_accuracy = Some(meters);
        self
    }

    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.coordinate.latitude()
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.coordinate.longitude()
    }

    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    #[must_use]
    pub const fn horizontal_accuracy(&self) -> Option<f64> {
        self.horizontal_accuracy
    }

    /// Great-circle distance to another location in meters
    ///
    /// Uses the Haversine formula on a spherical earth. The result does not
    /// depend on argument order.
    #[must_use]
    pub fn distance_meters(&self, other: &Self) -> f64 {
        let lat1_rad = self.latitude().to_radians();
        let lat2_rad = other.latitude().to_radians();
        let delta_lat = (other.latitude() - self.latitude()).to_radians();
        let delta_lon = (other.longitude() - self.longitude()).to_radians();

        let a = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
            (delta_lon / 2.0).sin().powi(2),
            (delta_lat / 2.0).sin().powi(2),
        );
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_METERS * c
    }
}

impl From<Coordinate> for Location {
    fn from(coordinate: Coordinate) -> Self {
        Self::new(coordinate)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate)?;
        if let Some(accuracy) = self.horizontal_accuracy {
            write!(f, " (±{accuracy:.0}m)")?;
        }
        Ok(())
    }
}

/// Well-known locations, handy for defaults and tests
impl Location {
    /// Berlin, Germany
    #[must_use]
    pub const fn berlin() -> Self {
        Self::new(Coordinate::new_unchecked(52.52, 13.405))
    }

    /// London, UK
    #[must_use]
    pub const fn london() -> Self {
        Self::new(Coordinate::new_unchecked(51.5074, -0.1278))
    }

    /// New York, USA
    #[must_use]
    pub const fn new_york() -> Self {
        Self::new(Coordinate::new_unchecked(40.7128, -74.006))
    }
}
