//! Value Objects - Immutable, identity-less domain primitives

mod accuracy;
mod coordinate;
mod location;
mod placemark;

pub use accuracy::DesiredAccuracy;
pub use coordinate::Coordinate;
pub use location::Location;
pub use placemark::Placemark;
