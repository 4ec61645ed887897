//! Placemark value object
//!
//! A structured address as produced by a geocoder. The fields are passed
//! through as the provider reports them; none of them are required.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Location;

/// Provider-produced address with its associated location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placemark {
    /// Location of the placemark
    pub location: Location,
    /// Name of the place (e.g., a landmark or building)
    #[serde(default)]
    pub name: Option<String>,
    /// Country name
    #[serde(default)]
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    #[serde(default)]
    pub iso_country_code: Option<String>,
    /// State or province
    #[serde(default)]
    pub administrative_area: Option<String>,
    /// City or town
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Street name
    #[serde(default)]
    pub thoroughfare: Option<String>,
    /// House number
    #[serde(default)]
    pub sub_thoroughfare: Option<String>,
    /// Full human-readable address as formatted by the provider
    #[serde(default)]
    pub formatted_address: Option<String>,
}

impl Placemark {
    /// Create a placemark with only a location
    #[must_use]
    pub const fn new(location: Location) -> Self {
        Self {
            location,
            name: None,
            country: None,
            iso_country_code: None,
            administrative_area: None,
            locality: None,
            postal_code: None,
            thoroughfare: None,
            sub_thoroughfare: None,
            formatted_address: None,
        }
    }

    /// Set the formatted address
    #[must_use]
    pub fn with_formatted_address(mut self, address: impl Into<String>) -> Self {
        self.formatted_address = Some(address.into());
        self
    }
}

impl fmt::Display for Placemark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref address) = self.formatted_address {
            return write!(f, "{address}");
        }
        let parts: Vec<&str> = [
            self.thoroughfare.as_deref(),
            self.sub_thoroughfare.as_deref(),
            self.postal_code.as_deref(),
            self.locality.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            write!(f, "{}", self.location)
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}
