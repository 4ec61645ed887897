//! Geocoding gateway
//!
//! Request/response wrapper around a [`GeocodingPort`]. Normalizes geocoder
//! errors into [`LocationError`], supports cancelling in-flight requests and
//! can write a geocoded address into the [`LocationSession`].

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use domain::value_objects::{Coordinate, Location, Placemark};
use tokio::sync::watch;
use tracing::{debug, instrument};

use super::LocationSession;
use crate::error::LocationError;
use crate::ports::GeocodingPort;

/// Message carried by requests resolved through [`GeocodeGateway::cancel_pending_geocode`]
pub const CANCELLED_MESSAGE: &str = "geocode request cancelled";

/// Forward and reverse geocoding for a location session
pub struct GeocodeGateway {
    geocoder: Arc<dyn GeocodingPort>,
    session: Arc<LocationSession>,
    /// Bumped on every cancellation; requests race against a change
    cancel_generation: watch::Sender<u64>,
    in_flight: AtomicUsize,
}

impl std::fmt::Debug for GeocodeGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeGateway")
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Decrements the in-flight counter when a request finishes or is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl GeocodeGateway {
    pub fn new(geocoder: Arc<dyn GeocodingPort>, session: Arc<LocationSession>) -> Self {
        let (cancel_generation, _) = watch::channel(0);
        Self {
            geocoder,
            session,
            cancel_generation,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Number of requests currently awaiting the geocoder
    pub fn pending_requests(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Resolve an address to placemarks
    #[instrument(skip(self))]
    pub async fn geocode_address(&self, address: &str) -> Result<Vec<Placemark>, LocationError> {
        self.run(self.geocoder.geocode(address)).await
    }

    /// Resolve an address and make its first placemark the current location
    ///
    /// Also records `address` as the current address. Unlike
    /// [`LocationSession::set_current_location`] this leaves a running update
    /// session untouched.
    #[instrument(skip(self))]
    pub async fn set_current_location_by_address(
        &self,
        address: &str,
    ) -> Result<Vec<Placemark>, LocationError> {
        let placemarks = self.geocode_address(address).await?;
        match placemarks.first() {
            Some(first) => self.session.apply_geocoded_location(address, first.location),
            None => debug!(%address, "Geocoder returned no placemarks, location unchanged"),
        }
        Ok(placemarks)
    }

    /// Resolve a location to placemarks
    #[instrument(skip(self))]
    pub async fn reverse_geocode(
        &self,
        location: &Location,
    ) -> Result<Vec<Placemark>, LocationError> {
        self.run(self.geocoder.reverse_geocode(location)).await
    }

    pub async fn reverse_geocode_coordinate(
        &self,
        coordinate: Coordinate,
    ) -> Result<Vec<Placemark>, LocationError> {
        self.reverse_geocode(&Location::from(coordinate)).await
    }

    /// Validate a latitude/longitude pair and reverse geocode it
    pub async fn reverse_geocode_lat_lon(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Placemark>, LocationError> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        self.reverse_geocode_coordinate(coordinate).await
    }

    /// Reverse geocode the session's current location
    pub async fn reverse_geocode_current(&self) -> Result<Vec<Placemark>, LocationError> {
        let location = self.session.current_location()?;
        self.reverse_geocode(&location).await
    }

    /// Cancel every request issued through this gateway that is still waiting
    ///
    /// Cancelled requests resolve with [`LocationError::GeocodeFailed`].
    pub fn cancel_pending_geocode(&self) {
        let pending = self.pending_requests();
        if pending == 0 {
            debug!("No geocode request in flight, nothing to cancel");
            return;
        }
        self.cancel_generation.send_modify(|generation| *generation += 1);
        self.geocoder.cancel_geocode();
        debug!(pending, "Cancelled pending geocode requests");
    }

    async fn run<F>(&self, request: F) -> Result<Vec<Placemark>, LocationError>
    where
        F: Future<Output = Result<Vec<Placemark>, LocationError>>,
    {
        let mut cancelled = self.cancel_generation.subscribe();
        let _in_flight = InFlight::enter(&self.in_flight);

        tokio::select! {
            result = request => result.map_err(normalize),
            _ = cancelled.changed() => Err(LocationError::GeocodeFailed(CANCELLED_MESSAGE.to_string())),
        }
    }
}

/// Fold every geocoder error into `GeocodeFailed`
///
/// Unreachable services and refused lookups are geocoding failures too;
/// `ProviderUnavailable` and `PermissionDenied` describe the location provider.
fn normalize(error: LocationError) -> LocationError {
    match error {
        LocationError::GeocodeFailed(_) => error,
        LocationError::ProviderUnavailable(message) | LocationError::PermissionDenied(message) => {
            LocationError::GeocodeFailed(message)
        },
        other => LocationError::GeocodeFailed(other.to_string()),
    }
}
