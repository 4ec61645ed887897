//! Application configuration
//!
//! Split into focused sections:
//! - `session`: desired accuracy and initial location
//! - `geocoding`: Nominatim client settings
//! - `simulation`: simulated location provider (optional)
//! - `telemetry`: log filter and format
//!
//! Sources are layered: built-in defaults, then an optional `config.toml`,
//! then environment variables such as `LOCUS__SESSION__ACCURACY=best`.

mod session;

use std::path::Path;

use application::LocationError;
use integration_nominatim::NominatimConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::telemetry::TelemetryConfig;

pub use session::{GeoLocationConfig, SessionAppConfig, SimulationAppConfig};

const ENV_PREFIX: &str = "LOCUS";
const ENV_SEPARATOR: &str = "__";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Location session settings
    #[serde(default)]
    pub session: SessionAppConfig,

    /// Geocoding service configuration
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// Simulated location provider (optional; absent means the caller
    /// supplies a provider)
    #[serde(default)]
    pub simulation: Option<SimulationAppConfig>,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value has the wrong type.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name("config").required(false))
    }

    /// Load configuration from an explicit file plus environment overrides
    ///
    /// The format is inferred from the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path.as_ref()))
    }

    /// Parse configuration from a TOML string, without environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value has the wrong type.
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;
        let app_config: Self = config.try_deserialize()?;
        debug!(
            accuracy = %app_config.session.accuracy,
            simulated = app_config.simulation.is_some(),
            "Configuration loaded"
        );
        Ok(app_config)
    }

    /// Check values the type system cannot
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Configuration`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), LocationError> {
        if let Some(ref initial) = self.session.initial_location {
            initial
                .to_coordinate()
                .map_err(|e| invalid("session.initial_location", &e))?;
        }

        if self.geocoding.base_url.trim().is_empty() {
            return Err(invalid("geocoding.base_url", &"must not be empty"));
        }
        if self.geocoding.result_limit == 0 {
            return Err(invalid("geocoding.result_limit", &"must be at least 1"));
        }

        if let Some(ref simulation) = self.simulation {
            if simulation.interval_ms == 0 {
                return Err(invalid("simulation.interval_ms", &"must be greater than 0"));
            }
            if !simulation.accuracy_meters.is_finite() || simulation.accuracy_meters < 0.0 {
                return Err(invalid(
                    "simulation.accuracy_meters",
                    &"must be a non-negative number",
                ));
            }
            if simulation.route.is_empty() {
                return Err(invalid("simulation.route", &"must contain a waypoint"));
            }
            for (index, waypoint) in simulation.route.iter().enumerate() {
                waypoint
                    .to_coordinate()
                    .map_err(|e| invalid(&format!("simulation.route[{index}]"), &e))?;
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &dyn std::fmt::Display) -> LocationError {
    LocationError::Configuration(format!("{field}: {reason}"))
}
