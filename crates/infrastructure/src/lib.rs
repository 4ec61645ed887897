//! Infrastructure layer - Adapters for external systems
//!
//! Implements the ports defined in the application layer (Nominatim
//! geocoding, simulated location provider) and provides configuration
//! loading, logging setup and the composition root.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use bootstrap::LocationServices;
pub use config::{AppConfig, GeoLocationConfig, SessionAppConfig, SimulationAppConfig};
pub use telemetry::{TelemetryConfig, TelemetryError, init_telemetry};
