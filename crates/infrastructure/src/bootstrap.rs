//! Composition root
//!
//! Wires a location provider, the Nominatim geocoding adapter, the session
//! with its event pump and the geocoding gateway from an [`AppConfig`].

use std::sync::Arc;

use application::ports::{
    GeocodingPort, LocationEventReceiver, LocationProviderPort, location_event_channel,
};
use application::{GeocodeGateway, LocationError, LocationSession, SessionConfig};
use domain::Location;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::info;

use crate::adapters::{NominatimGeocodingAdapter, SimulatedLocationProvider};
use crate::config::AppConfig;

/// Running location services
#[derive(Debug)]
pub struct LocationServices {
    session: Arc<LocationSession>,
    gateway: GeocodeGateway,
    event_pump: JoinHandle<()>,
}

impl LocationServices {
    /// Build services with the simulated provider from `config.simulation`
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Configuration`] if the configuration is
    /// invalid, has no `simulation` section, or no runtime is running.
    pub fn build(config: &AppConfig) -> Result<Self, LocationError> {
        config.validate()?;
        let simulation = config.simulation.as_ref().ok_or_else(|| {
            LocationError::Configuration(
                "no location provider configured; add a [simulation] section or use \
                 LocationServices::with_provider"
                    .to_string(),
            )
        })?;

        let (events_tx, events_rx) = location_event_channel();
        let provider = Arc::new(SimulatedLocationProvider::new(simulation, events_tx)?);
        Self::with_provider(config, provider, events_rx)
    }

    /// Build services around a caller-supplied provider
    ///
    /// `events` must be the receiving half of the channel `provider` reports to.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Configuration`] if the configuration is
    /// invalid or no runtime is running.
    pub fn with_provider(
        config: &AppConfig,
        provider: Arc<dyn LocationProviderPort>,
        events: LocationEventReceiver,
    ) -> Result<Self, LocationError> {
        let geocoder = Arc::new(NominatimGeocodingAdapter::new(&config.geocoding)?);
        Self::with_ports(config, provider, events, geocoder)
    }

    /// Build services from explicit ports
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Configuration`] if the configuration is
    /// invalid or no runtime is running.
    pub fn with_ports(
        config: &AppConfig,
        provider: Arc<dyn LocationProviderPort>,
        events: LocationEventReceiver,
        geocoder: Arc<dyn GeocodingPort>,
    ) -> Result<Self, LocationError> {
        config.validate()?;
        Handle::try_current().map_err(|e| LocationError::Configuration(e.to_string()))?;

        let initial_location = config
            .session
            .initial_location
            .map(|initial| initial.to_coordinate().map(Location::from))
            .transpose()?;

        let session = Arc::new(LocationSession::with_config(
            provider,
            SessionConfig {
                accuracy: config.session.accuracy,
                initial_location,
            },
        ));
        let event_pump = session.spawn_event_pump(events);
        let gateway = GeocodeGateway::new(geocoder, Arc::clone(&session));

        info!(
            accuracy = %config.session.accuracy,
            has_initial_location = initial_location.is_some(),
            "Location services ready"
        );
        Ok(Self {
            session,
            gateway,
            event_pump,
        })
    }

    /// The shared location session
    pub const fn session(&self) -> &Arc<LocationSession> {
        &self.session
    }

    /// The geocoding gateway bound to [`Self::session`]
    pub const fn gateway(&self) -> &GeocodeGateway {
        &self.gateway
    }

    /// Stop updates and the event pump
    pub fn shutdown(self) {
        self.session.stop_updating();
        self.gateway.cancel_pending_geocode();
        self.event_pump.abort();
        info!("Location services shut down");
    }
}
