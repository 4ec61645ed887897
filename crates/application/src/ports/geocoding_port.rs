//! Geocoding service port
//!
//! Defines the interface for forward (address → placemarks) and reverse
//! (location → placemarks) geocoding.

use async_trait::async_trait;
use domain::value_objects::{Location, Placemark};
#[cfg(test)]
use mockall::automock;

use crate::error::LocationError;

/// Port for geocoding operations
///
/// Each call is a single-shot request producing exactly one result.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve a free-form address to matching placemarks, best match first
    async fn geocode(&self, address: &str) -> Result<Vec<Placemark>, LocationError>;

    /// Resolve a location to the placemarks describing it
    async fn reverse_geocode(&self, location: &Location) -> Result<Vec<Placemark>, LocationError>;

    /// Abort any request the geocoder has in flight
    fn cancel_geocode(&self) {}
}
