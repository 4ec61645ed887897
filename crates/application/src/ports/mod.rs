//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod geocoding_port;
mod location_provider_port;

#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::GeocodingPort;
#[cfg(test)]
pub use location_provider_port::MockLocationProviderPort;
pub use location_provider_port::{
    LocationEvent, LocationEventReceiver, LocationEventSender, LocationProviderPort, ProviderEvent,
    UpdateRun, location_event_channel,
};
