//! Desired accuracy value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Accuracy level requested from the location provider
///
/// Coarser levels let the provider save power by using Wi-Fi or cell
/// positioning instead of GPS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DesiredAccuracy {
    /// Highest accuracy the hardware can deliver
    Best,
    /// Within ten meters
    NearestTenMeters,
    /// Within a hundred meters
    HundredMeters,
    /// Within one kilometer
    #[default]
    Kilometer,
    /// Within three kilometers
    ThreeKilometers,
}

impl DesiredAccuracy {
    /// Nominal accuracy radius in meters
    ///
    /// `Best` has no fixed radius and returns `None`.
    #[must_use]
    pub const fn radius_meters(&self) -> Option<f64> {
        match self {
            Self::Best => None,
            Self::NearestTenMeters => Some(10.0),
            Self::HundredMeters => Some(100.0),
            Self::Kilometer => Some(1_000.0),
            Self::ThreeKilometers => Some(3_000.0),
        }
    }

    /// Configuration key for this level
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::NearestTenMeters => "nearest_ten_meters",
            Self::HundredMeters => "hundred_meters",
            Self::Kilometer => "kilometer",
            Self::ThreeKilometers => "three_kilometers",
        }
    }

    /// All levels from finest to coarsest
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Best,
            Self::NearestTenMeters,
            Self::HundredMeters,
            Self::Kilometer,
            Self::ThreeKilometers,
        ]
    }
}

impl fmt::Display for DesiredAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DesiredAccuracy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::all()
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| DomainError::InvalidAccuracy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_kilometer() {
        assert_eq!(DesiredAccuracy::default(), DesiredAccuracy::Kilometer);
    }

    #[test]
    fn parse_roundtrips_display() {
        for level in DesiredAccuracy::all() {
            assert_eq!(level.to_string().parse::<DesiredAccuracy>().unwrap(), level);
        }
    }

    #[test]
    fn parse_accepts_dashes_and_case() {
        assert_eq!(
            "Hundred-Meters".parse::<DesiredAccuracy>().unwrap(),
            DesiredAccuracy::HundredMeters
        );
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "roughly".parse::<DesiredAccuracy>().unwrap_err();
        assert!(err.to_string().contains("roughly"));
    }

    #[test]
    fn radius_grows_with_level() {
        assert!(DesiredAccuracy::Best.radius_meters().is_none());
        let radii: Vec<f64> = DesiredAccuracy::all()
            .iter()
            .filter_map(DesiredAccuracy::radius_meters)
            .collect();
        assert!(radii.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&DesiredAccuracy::NearestTenMeters).unwrap();
        assert_eq!(json, "\"nearest_ten_meters\"");
    }
}
