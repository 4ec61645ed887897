//! Distance helpers on the location session

use domain::value_objects::Location;

use super::LocationSession;
use crate::error::LocationError;

impl LocationSession {
    /// Great-circle distance in meters, as computed by the provider
    pub fn distance_between(&self, a: &Location, b: &Location) -> f64 {
        self.provider().great_circle_distance(a, b)
    }

    /// Distance in meters from the current location to `to`
    pub fn distance_from_current(&self, to: &Location) -> Result<f64, LocationError> {
        let current = self.current_location()?;
        Ok(self.distance_between(&current, to))
    }
}
