//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod nominatim_geocoding_adapter;
mod simulated_location_provider;

pub use nominatim_geocoding_adapter::NominatimGeocodingAdapter;
pub use simulated_location_provider::{PermissionGrant, SimulatedLocationProvider};
