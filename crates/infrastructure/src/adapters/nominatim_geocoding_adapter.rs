//! Geocoding adapter - Implements GeocodingPort using integration_nominatim

use application::LocationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::{Coordinate, Location, Placemark};
use integration_nominatim::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient, NominatimPlace,
};
use tracing::{debug, instrument, warn};

/// Adapter for forward and reverse geocoding via Nominatim
#[derive(Debug)]
pub struct NominatimGeocodingAdapter<C = NominatimGeocodingClient> {
    client: C,
}

impl NominatimGeocodingAdapter {
    /// Create an adapter with its own HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &NominatimConfig) -> Result<Self, LocationError> {
        let client = NominatimGeocodingClient::new(config)
            .map_err(|e| LocationError::Configuration(e.to_string()))?;
        Ok(Self { client })
    }
}

impl<C: GeocodingClient> NominatimGeocodingAdapter<C> {
    /// Wrap an existing client
    pub const fn with_client(client: C) -> Self {
        Self { client }
    }

    fn map_error(err: GeocodingError) -> LocationError {
        if err.is_unavailable() {
            warn!(error = %err, "Geocoding service unreachable");
        }
        LocationError::GeocodeFailed(err.to_string())
    }

    fn map_place(place: NominatimPlace) -> Result<Placemark, LocationError> {
        let latitude = place.latitude().map_err(Self::map_error)?;
        let longitude = place.longitude().map_err(Self::map_error)?;
        let coordinate = Coordinate::new(latitude, longitude)
            .map_err(|e| LocationError::GeocodeFailed(e.to_string()))?;

        let mut placemark = Placemark::new(Location::from(coordinate));
        placemark.name = place.place_name().map(str::to_string);
        placemark.formatted_address = place.display_name;
        if let Some(address) = place.address {
            placemark.locality = address.settlement().map(str::to_string);
            placemark.iso_country_code = address.country_code.map(|c| c.to_uppercase());
            placemark.country = address.country;
            placemark.administrative_area = address.state;
            placemark.postal_code = address.postcode;
            placemark.thoroughfare = address.road;
            placemark.sub_thoroughfare = address.house_number;
        }
        Ok(placemark)
    }
}

#[async_trait]
impl<C> GeocodingPort for NominatimGeocodingAdapter<C>
where
    C: GeocodingClient + 'static,
{
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Vec<Placemark>, LocationError> {
        let places = self.client.search(address).await.map_err(Self::map_error)?;

        let mut placemarks = Vec::with_capacity(places.len());
        let mut last_error = None;
        for place in places {
            match Self::map_place(place) {
                Ok(placemark) => placemarks.push(placemark),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed geocoding result");
                    last_error = Some(e);
                },
            }
        }

        match (placemarks.is_empty(), last_error) {
            (true, Some(e)) => Err(e),
            _ => {
                debug!(count = placemarks.len(), "Geocoded address");
                Ok(placemarks)
            },
        }
    }

    #[instrument(skip(self))]
    async fn reverse_geocode(&self, location: &Location) -> Result<Vec<Placemark>, LocationError> {
        let place = self
            .client
            .reverse(location.latitude(), location.longitude())
            .await
            .map_err(Self::map_error)?;
        Ok(vec![Self::map_place(place)?])
    }

    fn cancel_geocode(&self) {
        // HTTP requests are aborted when the gateway drops their futures.
        debug!("Geocode cancellation requested");
    }
}
