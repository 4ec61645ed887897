//! Location provider port
//!
//! Defines the capability a device location service offers to the session:
//! permission requests, accuracy configuration and starting/stopping a stream
//! of position fixes. Fixes and failures flow back to the session as
//! [`LocationEvent`]s.

use domain::value_objects::{DesiredAccuracy, Location};
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc;

use crate::error::LocationError;

/// Event delivered by a provider to the location session
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// One or more new fixes, oldest first
    LocationsUpdated(Vec<Location>),
    /// Single-step change report from providers that emit the previous and
    /// the new fix together
    LocationChanged {
        /// Previous fix
        from: Location,
        /// New fix
        to: Location,
    },
    /// The provider failed to produce a fix
    Failed(LocationError),
}

/// Identifies one start-to-stop span of provider updates
///
/// The session hands a fresh run to every `start_continuous_updates` call and
/// ignores events tagged with any other run, so fixes still queued from a
/// stopped session never reach the next session's callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UpdateRun(u64);

impl UpdateRun {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

/// A [`LocationEvent`] tagged with the run that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEvent {
    pub run: UpdateRun,
    pub event: LocationEvent,
}

impl ProviderEvent {
    pub const fn new(run: UpdateRun, event: LocationEvent) -> Self {
        Self { run, event }
    }
}

/// Sending half used by providers to report events
pub type LocationEventSender = mpsc::UnboundedSender<ProviderEvent>;

/// Receiving half drained by the session's event pump
pub type LocationEventReceiver = mpsc::UnboundedReceiver<ProviderEvent>;

/// Create the channel connecting a provider to a session
pub fn location_event_channel() -> (LocationEventSender, LocationEventReceiver) {
    mpsc::unbounded_channel()
}

/// Port for a device location provider
///
/// The session issues these commands while holding its state lock, so
/// implementations must not call back into the session synchronously from
/// them. Results are reported asynchronously through a
/// [`LocationEventSender`].
#[cfg_attr(test, automock)]
pub trait LocationProviderPort: Send + Sync {
    /// Ask for location permission
    ///
    /// Always requests foreground ("when in use") access; `background`
    /// additionally requests "always" access. The outcome is reported through
    /// the provider's own channels.
    fn request_permission(&self, background: bool);

    /// Set the accuracy used for subsequent fixes
    fn configure_accuracy(&self, accuracy: DesiredAccuracy);

    /// Begin delivering fixes
    ///
    /// Every event reported until the next stop must carry `run`.
    fn start_continuous_updates(&self, run: UpdateRun);

    /// Stop delivering fixes
    ///
    /// Advisory: events already in flight may still arrive.
    fn stop_continuous_updates(&self);

    /// Great-circle distance between two locations in meters
    fn great_circle_distance(&self, a: &Location, b: &Location) -> f64 {
        a.distance_meters(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullProvider;

    impl LocationProviderPort for NullProvider {
        fn request_permission(&self, _background: bool) {}
        fn configure_accuracy(&self, _accuracy: DesiredAccuracy) {}
        fn start_continuous_updates(&self, _run: UpdateRun) {}
        fn stop_continuous_updates(&self) {}
    }

    fn _assert_object_safe(_: &dyn LocationProviderPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn LocationProviderPort>();
    }

    #[test]
    fn runs_are_distinct() {
        let first = UpdateRun::default().next();
        assert_ne!(first, first.next());
        assert_eq!(UpdateRun::new(u64::MAX).next(), UpdateRun::default());
    }

    #[test]
    fn default_distance_uses_haversine() {
        let provider = NullProvider;
        let d = provider.great_circle_distance(&Location::berlin(), &Location::london());
        assert!((d - Location::berlin().distance_meters(&Location::london())).abs() < 1e-9);
    }

    #[tokio::test]
    async fn channel_delivers_in_order() {
        let (tx, mut rx) = location_event_channel();
        let run = UpdateRun::default().next();
        tx.send(ProviderEvent::new(
            run,
            LocationEvent::LocationsUpdated(vec![Location::berlin()]),
        ))
        .unwrap();
        tx.send(ProviderEvent::new(
            run,
            LocationEvent::Failed(LocationError::ProviderUnavailable("lost".to_string())),
        ))
        .unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.run.id(), 1);
        assert!(matches!(first.event, LocationEvent::LocationsUpdated(_)));
        assert!(matches!(
            rx.recv().await.map(|e| e.event),
            Some(LocationEvent::Failed(_))
        ));
    }
}
