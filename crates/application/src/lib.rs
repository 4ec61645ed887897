//! Application layer - Location session and geocoding use cases
//!
//! Contains the update-session state machine, the geocoding gateway and the
//! port definitions that location providers and geocoders implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::LocationError;
pub use ports::*;
pub use services::*;
