//! Application services - Use case implementations

mod distance;
mod geocode_gateway;
mod location_session;

pub use geocode_gateway::{CANCELLED_MESSAGE, GeocodeGateway};
pub use location_session::{LocationSession, SessionConfig, SessionPhase, UpdateCallback};
