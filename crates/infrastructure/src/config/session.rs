//! Session and simulation settings

use domain::{Coordinate, DesiredAccuracy, DomainError};
use serde::{Deserialize, Serialize};

/// Geographic location configuration (latitude/longitude pair)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocationConfig {
    /// Latitude (-90.0 to 90.0)
    pub latitude: f64,
    /// Longitude (-180.0 to 180.0)
    pub longitude: f64,
}

impl GeoLocationConfig {
    /// Convert to a validated domain `Coordinate`
    pub fn to_coordinate(&self) -> Result<Coordinate, DomainError> {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Settings applied to the location session at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAppConfig {
    /// Accuracy requested from the provider (default: kilometer)
    #[serde(default)]
    pub accuracy: DesiredAccuracy,

    /// Location to start from before the first fix arrives
    #[serde(default)]
    pub initial_location: Option<GeoLocationConfig>,
}

/// Simulated location provider settings
///
/// When present, the composition root uses a provider that replays `route`
/// in a loop instead of device hardware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationAppConfig {
    /// Waypoints emitted in order, one per tick
    #[serde(default)]
    pub route: Vec<GeoLocationConfig>,

    /// Time between fixes in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Best horizontal accuracy the simulated hardware reports, in meters
    #[serde(default = "default_accuracy_meters")]
    pub accuracy_meters: f64,

    /// Refuse permission, so that every start reports `PermissionDenied`
    #[serde(default)]
    pub deny_permission: bool,
}

const fn default_interval_ms() -> u64 {
    1000
}

const fn default_accuracy_meters() -> f64 {
    5.0
}

impl Default for SimulationAppConfig {
    fn default() -> Self {
        Self {
            route: Vec::new(),
            interval_ms: default_interval_ms(),
            accuracy_meters: default_accuracy_meters(),
            deny_permission: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_location_to_coordinate() {
        let config = GeoLocationConfig {
            latitude: 52.52,
            longitude: 13.405,
        };
        let coordinate = config.to_coordinate().unwrap();
        assert!((coordinate.latitude() - 52.52).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_geo_location() {
        let config = GeoLocationConfig {
            latitude: 91.0,
            longitude: 0.0,
        };
        assert!(config.to_coordinate().is_err());
    }

    #[test]
    fn test_simulation_defaults() {
        let config = SimulationAppConfig::default();
        assert!(config.route.is_empty());
        assert_eq!(config.interval_ms, 1000);
        assert!((config.accuracy_meters - 5.0).abs() < f64::EPSILON);
        assert!(!config.deny_permission);
    }
}
