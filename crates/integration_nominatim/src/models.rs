//! Nominatim response models
//!
//! Typed representations of the `jsonv2` place records returned by the
//! `/search` and `/reverse` endpoints with `addressdetails=1`.

use serde::{Deserialize, Serialize};

use crate::error::GeocodingError;

/// A place returned by Nominatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominatimPlace {
    /// Latitude as a decimal string
    pub lat: String,
    /// Longitude as a decimal string
    pub lon: String,
    /// Full formatted address
    #[serde(default)]
    pub display_name: Option<String>,
    /// Name of the place itself, if it has one
    #[serde(default)]
    pub name: Option<String>,
    /// Structured address components
    #[serde(default)]
    pub address: Option<NominatimAddress>,
}

impl NominatimPlace {
    /// Parsed latitude
    pub fn latitude(&self) -> Result<f64, GeocodingError> {
        self.lat
            .parse()
            .map_err(|_| GeocodingError::ParseError(format!("Invalid latitude: {}", self.lat)))
    }

    /// Parsed longitude
    pub fn longitude(&self) -> Result<f64, GeocodingError> {
        self.lon
            .parse()
            .map_err(|_| GeocodingError::ParseError(format!("Invalid longitude: {}", self.lon)))
    }

    /// Name of the place, ignoring empty strings
    pub fn place_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// Structured address components (`addressdetails=1`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominatimAddress {
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Lowercase ISO 3166-1 alpha-2 code
    #[serde(default)]
    pub country_code: Option<String>,
}

impl NominatimAddress {
    /// Settlement name, preferring city over town over village
    pub fn settlement(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or(self.town.as_deref())
            .or(self.village.as_deref())
    }
}

/// Body of `/reverse`: a place, or an error object when nothing matched
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ReverseResponse {
    Place(NominatimPlace),
    Error { error: String },
}
