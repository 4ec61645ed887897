//! Location update session
//!
//! Holds the current location, current address and accuracy setting, and
//! runs the update-session state machine that sequences provider events
//! against caller requests.
//!
//! ```text
//! Idle ──start_updating──▶ Updating ──stop_updating──▶ Idle
//! Idle ──update_once────▶ UpdatingOnce ──first fix or failure──▶ Idle
//! Updating ──update_once──▶ Updating   (joins the running session)
//! any ──set_current_location──▶ Idle
//! ```
//!
//! A session has a single subscriber: the callback passed to the request that
//! moved it out of `Idle`. Requests made while updating never replace it.
//!
//! Every start opens a new [`UpdateRun`]. Provider events tagged with an
//! older run are dropped, even when a newer session is already updating.

use std::fmt;
use std::sync::{Arc, Weak};

use domain::value_objects::{Coordinate, DesiredAccuracy, Location};
use parking_lot::{Mutex, ReentrantMutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::LocationError;
use crate::ports::{
    LocationEvent, LocationEventReceiver, LocationProviderPort, ProviderEvent, UpdateRun,
};

/// Callback receiving each fix (or failure) of an update session
pub type UpdateCallback = Arc<dyn Fn(Result<Location, LocationError>) + Send + Sync>;

/// Observable phase of the update-session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No update session is running
    Idle,
    /// Continuous updates are running
    Updating,
    /// Waiting for a single fix, after which the session stops
    UpdatingOnce,
}

/// Initial settings for a session
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Accuracy requested from the provider
    pub accuracy: DesiredAccuracy,
    /// Location to start with, as if set manually
    pub initial_location: Option<Location>,
}

struct SessionState {
    current_location: Option<Location>,
    current_address: Option<String>,
    desired_accuracy: DesiredAccuracy,
    is_updating: bool,
    is_one_shot: bool,
    /// Set if and only if `is_updating`
    pending_callback: Option<UpdateCallback>,
    /// Run handed to the provider by the latest start
    run: UpdateRun,
}

/// Stateful facade over a location provider
///
/// Construct one per application in the composition root and share it as
/// `Arc<LocationSession>`.
pub struct LocationSession {
    provider: Arc<dyn LocationProviderPort>,
    state: Mutex<SessionState>,
    /// Held for the whole of a callback delivery, taken before `state`
    delivery: ReentrantMutex<()>,
}

impl fmt::Debug for LocationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("LocationSession")
            .field("current_location", &state.current_location)
            .field("current_address", &state.current_address)
            .field("desired_accuracy", &state.desired_accuracy)
            .field("is_updating", &state.is_updating)
            .field("is_one_shot", &state.is_one_shot)
            .field("run", &state.run)
            .finish_non_exhaustive()
    }
}

impl LocationSession {
    /// Create a session with default settings
    pub fn new(provider: Arc<dyn LocationProviderPort>) -> Self {
        Self::with_config(provider, SessionConfig::default())
    }

    /// Create a session and configure the provider's accuracy
    pub fn with_config(provider: Arc<dyn LocationProviderPort>, config: SessionConfig) -> Self {
        provider.configure_accuracy(config.accuracy);
        Self {
            provider,
            state: Mutex::new(SessionState {
                current_location: config.initial_location,
                current_address: None,
                desired_accuracy: config.accuracy,
                is_updating: false,
                is_one_shot: false,
                pending_callback: None,
                run: UpdateRun::default(),
            }),
            delivery: ReentrantMutex::new(()),
        }
    }

    pub(crate) fn provider(&self) -> &dyn LocationProviderPort {
        self.provider.as_ref()
    }

    /// Forward a permission request to the provider
    pub fn request_authorization(&self, include_background: bool) {
        debug!(include_background, "Requesting location authorization");
        self.provider.request_permission(include_background);
    }

    pub fn accuracy(&self) -> DesiredAccuracy {
        self.state.lock().desired_accuracy
    }

    /// Change the desired accuracy, reconfiguring the provider immediately
    pub fn set_accuracy(&self, accuracy: DesiredAccuracy) {
        let mut state = self.state.lock();
        state.desired_accuracy = accuracy;
        self.provider.configure_accuracy(accuracy);
        debug!(%accuracy, "Desired accuracy changed");
    }

    pub fn current_location(&self) -> Result<Location, LocationError> {
        self.state
            .lock()
            .current_location
            .ok_or(LocationError::NotAvailable("current location"))
    }

    /// Address last resolved through the geocoding gateway
    pub fn current_address(&self) -> Result<String, LocationError> {
        self.state
            .lock()
            .current_address
            .clone()
            .ok_or(LocationError::NotAvailable("current address"))
    }

    /// Override the current location manually
    ///
    /// Stops any running update session first: a manual location always wins
    /// over live tracking.
    pub fn set_current_location(&self, coordinate: Coordinate) {
        {
            let mut state = self.state.lock();
            self.stop_locked(&mut state);
            state.current_location = Some(Location::from(coordinate));
        }
        info!(%coordinate, "Current location set manually");
        self.wait_for_delivery();
    }

    /// Validate a latitude/longitude pair and override the current location
    pub fn set_current_location_lat_lon(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), LocationError> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        self.set_current_location(coordinate);
        Ok(())
    }

    /// Record a geocoded address and its location without touching the
    /// update session
    pub(crate) fn apply_geocoded_location(&self, address: &str, location: Location) {
        let mut state = self.state.lock();
        state.current_location = Some(location);
        state.current_address = Some(address.to_string());
        debug!(%address, %location, "Current location set from address");
    }

    /// Start continuous updates
    ///
    /// No-op while already updating: the running session keeps its callback
    /// and the provider is not restarted.
    pub fn start_updating<F>(&self, callback: F)
    where
        F: Fn(Result<Location, LocationError>) + Send + Sync + 'static,
    {
        let mut state = self.state.lock();
        self.start_locked(&mut state, Arc::new(callback));
    }

    /// Request a single fix, after which the session stops by itself
    ///
    /// While a continuous session is running this joins it instead: the
    /// session stays continuous and `callback` is never invoked.
    pub fn update_once<F>(&self, callback: F)
    where
        F: Fn(Result<Location, LocationError>) + Send + Sync + 'static,
    {
        let mut state = self.state.lock();
        if state.is_updating {
            debug!("Update session already running, single fix request joins it");
            return;
        }
        state.is_one_shot = true;
        self.start_locked(&mut state, Arc::new(callback));
    }

    /// Stop updates and discard the pending callback
    ///
    /// Safe to call while idle. If another thread is inside the callback when
    /// this is called, it returns only once that invocation has finished, so
    /// no callback is running or will run after it returns. A callback must
    /// not block on a thread that is itself stopping the session.
    pub fn stop_updating(&self) {
        {
            let mut state = self.state.lock();
            self.stop_locked(&mut state);
        }
        self.wait_for_delivery();
    }

    /// Block until no other thread is delivering a callback
    ///
    /// Reentrant: a callback stopping its own session does not wait on itself.
    fn wait_for_delivery(&self) {
        drop(self.delivery.lock());
    }

    fn start_locked(&self, state: &mut SessionState, callback: UpdateCallback) {
        if state.is_updating {
            debug!("Update session already running, ignoring start request");
            return;
        }
        state.is_updating = true;
        state.pending_callback = Some(callback);
        state.run = state.run.next();
        self.provider.start_continuous_updates(state.run);
        info!(
            one_shot = state.is_one_shot,
            accuracy = %state.desired_accuracy,
            run = state.run.id(),
            "Location updates started"
        );
    }

    fn stop_locked(&self, state: &mut SessionState) {
        let was_updating = state.is_updating;
        state.is_one_shot = false;
        state.is_updating = false;
        state.pending_callback = None;
        self.provider.stop_continuous_updates();
        if was_updating {
            info!("Location updates stopped");
        }
    }

    pub fn phase(&self) -> SessionPhase {
        let state = self.state.lock();
        match (state.is_updating, state.is_one_shot) {
            (false, _) => SessionPhase::Idle,
            (true, false) => SessionPhase::Updating,
            (true, true) => SessionPhase::UpdatingOnce,
        }
    }

    pub fn is_updating(&self) -> bool {
        self.state.lock().is_updating
    }

    pub fn has_pending_callback(&self) -> bool {
        self.state.lock().pending_callback.is_some()
    }

    /// Run opened by the latest start; events tagged otherwise are stale
    pub fn current_run(&self) -> UpdateRun {
        self.state.lock().run
    }

    /// Handle a batch of fixes from the provider
    ///
    /// Only the last fix of the batch becomes the current location. Batches
    /// arriving while idle (late events after a stop) are dropped.
    pub fn on_locations_updated(&self, locations: &[Location]) {
        self.accept_fixes(None, locations);
    }

    /// Handle a single-step change report (previous and new fix)
    pub fn on_location_changed(&self, from: Location, to: Location) {
        self.accept_fixes(None, &[from, to]);
    }

    /// Handle a provider failure
    ///
    /// A continuous session keeps running; a single-fix session stops.
    pub fn on_failure(&self, error: LocationError) {
        self.accept_failure(None, error);
    }

    /// Dispatch a provider event to the matching handler
    ///
    /// Events from a run other than [`Self::current_run`] are dropped.
    pub fn handle_event(&self, event: ProviderEvent) {
        let ProviderEvent { run, event } = event;
        match event {
            LocationEvent::LocationsUpdated(locations) => self.accept_fixes(Some(run), &locations),
            LocationEvent::LocationChanged { from, to } => self.accept_fixes(Some(run), &[from, to]),
            LocationEvent::Failed(error) => self.accept_failure(Some(run), error),
        }
    }

    /// Whether an event from `run` belongs to the running session
    fn accepts(state: &SessionState, run: Option<UpdateRun>) -> bool {
        if !state.is_updating {
            return false;
        }
        match run {
            Some(run) if run != state.run => {
                debug!(stale = run.id(), current = state.run.id(), "Dropping event from a previous run");
                false
            },
            _ => true,
        }
    }

    fn accept_fixes(&self, run: Option<UpdateRun>, locations: &[Location]) {
        let _delivery = self.delivery.lock();
        let (callback, location) = {
            let mut state = self.state.lock();
            if !Self::accepts(&state, run) {
                debug!(count = locations.len(), "Dropping location update outside the running session");
                return;
            }
            let Some(&location) = locations.last() else {
                warn!("Provider reported an empty location batch");
                return;
            };
            let callback = state.pending_callback.clone();
            if state.is_one_shot {
                self.stop_locked(&mut state);
            }
            state.current_location = Some(location);
            (callback, location)
        };

        debug!(%location, "Location updated");
        if let Some(callback) = callback {
            callback(Ok(location));
        }
    }

    fn accept_failure(&self, run: Option<UpdateRun>, error: LocationError) {
        let _delivery = self.delivery.lock();
        let callback = {
            let mut state = self.state.lock();
            if !Self::accepts(&state, run) {
                debug!(%error, "Dropping provider failure outside the running session");
                return;
            }
            let callback = state.pending_callback.clone();
            if state.is_one_shot {
                self.stop_locked(&mut state);
            }
            callback
        };

        warn!(%error, "Location provider reported a failure");
        if let Some(callback) = callback {
            callback(Err(error));
        }
    }

    /// Drain provider events into this session on a background task
    ///
    /// The task holds only a weak reference and ends once every sender is
    /// dropped or the session itself is gone.
    pub fn spawn_event_pump(self: &Arc<Self>, mut events: LocationEventReceiver) -> JoinHandle<()> {
        let session: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let Some(session) = session.upgrade() else {
                    break;
                };
                session.handle_event(event);
            }
            debug!("Location event pump finished");
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use mockall::predicate::eq;

    use super::*;
    use crate::ports::{MockLocationProviderPort, location_event_channel};

    /// Provider mock that accepts any command
    fn permissive_provider() -> MockLocationProviderPort {
        let mut provider = MockLocationProviderPort::new();
        provider.expect_request_permission().returning(|_| ());
        provider.expect_configure_accuracy().returning(|_| ());
        provider.expect_start_continuous_updates().returning(|_| ());
        provider.expect_stop_continuous_updates().returning(|| ());
        provider
    }

    fn session() -> LocationSession {
        LocationSession::new(Arc::new(permissive_provider()))
    }

    type Received = Arc<parking_lot::Mutex<Vec<Result<Location, LocationError>>>>;

    fn recorder() -> (
        Received,
        impl Fn(Result<Location, LocationError>) + Send + Sync + 'static,
    ) {
        let received: Received = Arc::default();
        let sink = Arc::clone(&received);
        (received, move |result| sink.lock().push(result))
    }

    fn fix(lat: f64, lon: f64) -> Location {
        Location::from(Coordinate::new_unchecked(lat, lon))
    }

    #[test]
    fn fresh_session_is_idle_without_location() {
        let session = session();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(
            session.current_location(),
            Err(LocationError::NotAvailable("current location"))
        );
        assert_eq!(
            session.current_address(),
            Err(LocationError::NotAvailable("current address"))
        );
        assert_eq!(session.accuracy(), DesiredAccuracy::Kilometer);
    }

    #[test]
    fn constructor_configures_provider_accuracy() {
        let mut provider = MockLocationProviderPort::new();
        provider
            .expect_configure_accuracy()
            .with(eq(DesiredAccuracy::HundredMeters))
            .times(1)
            .returning(|_| ());

        let session = LocationSession::with_config(
            Arc::new(provider),
            SessionConfig {
                accuracy: DesiredAccuracy::HundredMeters,
                initial_location: Some(Location::berlin()),
            },
        );
        assert_eq!(session.current_location(), Ok(Location::berlin()));
    }

    #[test]
    fn set_accuracy_reconfigures_provider() {
        let mut provider = MockLocationProviderPort::new();
        provider
            .expect_configure_accuracy()
            .with(eq(DesiredAccuracy::Kilometer))
            .times(1)
            .returning(|_| ());
        provider
            .expect_configure_accuracy()
            .with(eq(DesiredAccuracy::Best))
            .times(1)
            .returning(|_| ());

        let session = LocationSession::new(Arc::new(provider));
        session.set_accuracy(DesiredAccuracy::Best);
        assert_eq!(session.accuracy(), DesiredAccuracy::Best);
    }

    #[test]
    fn request_authorization_forwards_scope() {
        let mut provider = MockLocationProviderPort::new();
        provider.expect_configure_accuracy().returning(|_| ());
        provider
            .expect_request_permission()
            .with(eq(true))
            .times(1)
            .returning(|_| ());

        let session = LocationSession::new(Arc::new(provider));
        session.request_authorization(true);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn start_updating_starts_provider_once() {
        let mut provider = MockLocationProviderPort::new();
        provider.expect_configure_accuracy().returning(|_| ());
        provider
            .expect_start_continuous_updates()
            .with(eq(UpdateRun::new(1)))
            .times(1)
            .returning(|_| ());

        let session = LocationSession::new(Arc::new(provider));
        session.start_updating(|_| {});
        session.start_updating(|_| {});
        assert_eq!(session.phase(), SessionPhase::Updating);
        assert!(session.has_pending_callback());
    }

    #[test]
    fn second_start_does_not_replace_callback() {
        let session = session();
        let (first, first_cb) = recorder();
        let (second, second_cb) = recorder();

        session.start_updating(first_cb);
        session.start_updating(second_cb);
        session.on_locations_updated(&[Location::berlin()]);

        assert_eq!(first.lock().len(), 1);
        assert!(second.lock().is_empty());
    }

    #[test]
    fn continuous_session_survives_updates_and_failures() {
        let session = session();
        let (received, cb) = recorder();

        session.start_updating(cb);
        session.on_locations_updated(&[fix(1.0, 1.0)]);
        session.on_failure(LocationError::ProviderUnavailable("tunnel".to_string()));
        session.on_locations_updated(&[fix(2.0, 2.0)]);

        assert_eq!(session.phase(), SessionPhase::Updating);
        let received = received.lock();
        assert_eq!(received.len(), 3);
        assert!(received[1].is_err());
        assert_eq!(session.current_location(), Ok(fix(2.0, 2.0)));
    }

    #[test]
    fn last_fix_of_batch_wins() {
        let session = session();
        let (received, cb) = recorder();

        session.start_updating(cb);
        session.on_locations_updated(&[fix(1.0, 1.0), fix(2.0, 2.0), fix(3.0, 3.0)]);

        assert_eq!(received.lock().as_slice(), &[Ok(fix(3.0, 3.0))]);
        assert_eq!(session.current_location(), Ok(fix(3.0, 3.0)));
    }

    #[test]
    fn update_once_fires_once_then_idles() {
        let session = session();
        let (received, cb) = recorder();

        session.update_once(cb);
        assert_eq!(session.phase(), SessionPhase::UpdatingOnce);

        session.on_locations_updated(&[Location::london()]);
        session.on_locations_updated(&[Location::berlin()]);

        assert_eq!(received.lock().as_slice(), &[Ok(Location::london())]);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(!session.has_pending_callback());
        assert_eq!(session.current_location(), Ok(Location::london()));
    }

    #[test]
    fn update_once_failure_fires_once_then_idles() {
        let session = session();
        let (received, cb) = recorder();
        let error = LocationError::PermissionDenied("user declined".to_string());

        session.update_once(cb);
        session.on_failure(error.clone());
        session.on_failure(error.clone());

        assert_eq!(received.lock().as_slice(), &[Err(error)]);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.current_location().is_err());
    }

    #[test]
    fn update_once_joins_running_session() {
        let session = session();
        let (continuous, continuous_cb) = recorder();
        let (once, once_cb) = recorder();

        session.start_updating(continuous_cb);
        session.update_once(once_cb);
        assert_eq!(session.phase(), SessionPhase::Updating);

        session.on_locations_updated(&[Location::berlin()]);
        session.on_locations_updated(&[Location::london()]);

        assert_eq!(continuous.lock().len(), 2);
        assert!(once.lock().is_empty());
        assert_eq!(session.phase(), SessionPhase::Updating);
    }

    #[test]
    fn late_update_after_stop_is_dropped() {
        let session = session();
        let (received, cb) = recorder();

        session.start_updating(cb);
        session.stop_updating();
        session.on_locations_updated(&[Location::berlin()]);
        session.on_failure(LocationError::ProviderUnavailable("late".to_string()));

        assert!(received.lock().is_empty());
        assert!(session.current_location().is_err());
    }

    #[test]
    fn stop_is_idempotent_and_always_forwarded() {
        let mut provider = MockLocationProviderPort::new();
        provider.expect_configure_accuracy().returning(|_| ());
        provider
            .expect_stop_continuous_updates()
            .times(2)
            .returning(|| ());

        let session = LocationSession::new(Arc::new(provider));
        session.stop_updating();
        session.stop_updating();
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn empty_batch_is_ignored() {
        let session = session();
        let (received, cb) = recorder();

        session.update_once(cb);
        session.on_locations_updated(&[]);

        assert!(received.lock().is_empty());
        assert_eq!(session.phase(), SessionPhase::UpdatingOnce);
    }

    #[test]
    fn manual_location_stops_updates() {
        let session = session();
        let (received, cb) = recorder();
        let coordinate = Coordinate::new(48.137, 11.575).unwrap();

        session.start_updating(cb);
        session.set_current_location(coordinate);

        assert!(!session.is_updating());
        assert!(!session.has_pending_callback());
        assert_eq!(session.current_location(), Ok(Location::from(coordinate)));

        session.on_locations_updated(&[Location::berlin()]);
        assert!(received.lock().is_empty());
        assert_eq!(session.current_location(), Ok(Location::from(coordinate)));
    }

    #[test]
    fn manual_lat_lon_is_validated() {
        let session = session();
        let err = session.set_current_location_lat_lon(120.0, 0.0).unwrap_err();
        assert!(matches!(err, LocationError::Domain(_)));
        assert!(session.current_location().is_err());

        session.set_current_location_lat_lon(51.5074, -0.1278).unwrap();
        assert_eq!(session.current_location(), Ok(Location::london()));
    }

    #[test]
    fn location_changed_uses_new_fix() {
        let session = session();
        let (received, cb) = recorder();

        session.start_updating(cb);
        session.on_location_changed(Location::berlin(), Location::london());

        assert_eq!(received.lock().as_slice(), &[Ok(Location::london())]);
    }

    #[test]
    fn callback_may_stop_the_session() {
        let session = Arc::new(session());
        let calls = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&session);
        let counter = Arc::clone(&calls);
        session.start_updating(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(session) = weak.upgrade() {
                session.stop_updating();
            }
        });

        session.on_locations_updated(&[Location::berlin()]);
        session.on_locations_updated(&[Location::london()]);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn each_start_opens_a_new_run() {
        let session = session();
        assert_eq!(session.current_run(), UpdateRun::default());

        session.start_updating(|_| {});
        let first = session.current_run();
        session.start_updating(|_| {});
        assert_eq!(session.current_run(), first);

        session.stop_updating();
        session.update_once(|_| {});
        assert_ne!(session.current_run(), first);
    }

    #[test]
    fn events_from_previous_run_are_dropped() {
        let session = session();
        let (old, old_cb) = recorder();
        let (new, new_cb) = recorder();

        session.start_updating(old_cb);
        let stale = session.current_run();
        session.stop_updating();
        session.start_updating(new_cb);

        session.handle_event(ProviderEvent::new(
            stale,
            LocationEvent::LocationsUpdated(vec![Location::berlin()]),
        ));
        session.handle_event(ProviderEvent::new(
            stale,
            LocationEvent::Failed(LocationError::ProviderUnavailable("old".to_string())),
        ));
        assert!(old.lock().is_empty());
        assert!(new.lock().is_empty());
        assert!(session.current_location().is_err());

        session.handle_event(ProviderEvent::new(
            session.current_run(),
            LocationEvent::LocationsUpdated(vec![Location::london()]),
        ));
        assert_eq!(new.lock().as_slice(), &[Ok(Location::london())]);
    }

    #[test]
    fn stop_waits_for_running_callback() {
        use std::sync::atomic::AtomicBool;
        use std::time::Duration;

        let session = Arc::new(session());
        let entered = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));

        let (entered_cb, finished_cb) = (Arc::clone(&entered), Arc::clone(&finished));
        session.start_updating(move |_| {
            entered_cb.store(true, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(100));
            finished_cb.store(true, Ordering::SeqCst);
        });

        let deliverer = {
            let session = Arc::clone(&session);
            std::thread::spawn(move || session.on_locations_updated(&[Location::berlin()]))
        };
        while !entered.load(Ordering::SeqCst) {
            std::thread::yield_now();
        }

        session.stop_updating();
        assert!(finished.load(Ordering::SeqCst));
        assert_eq!(session.phase(), SessionPhase::Idle);
        deliverer.join().unwrap();
    }

    #[tokio::test]
    async fn event_pump_delivers_channel_events() {
        let session = Arc::new(session());
        let (tx, rx) = location_event_channel();
        let (received, cb) = recorder();

        session.update_once(cb);
        let pump = session.spawn_event_pump(rx);

        tx.send(ProviderEvent::new(
            session.current_run(),
            LocationEvent::LocationsUpdated(vec![Location::new_york()]),
        ))
        .unwrap();
        drop(tx);
        pump.await.unwrap();

        assert_eq!(received.lock().as_slice(), &[Ok(Location::new_york())]);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn event_pump_ends_when_session_dropped() {
        let session = Arc::new(session());
        let (tx, rx) = location_event_channel();
        let pump = session.spawn_event_pump(rx);

        drop(session);
        tx.send(ProviderEvent::new(
            UpdateRun::default(),
            LocationEvent::Failed(LocationError::ProviderUnavailable("gone".to_string())),
        ))
        .unwrap();

        pump.await.unwrap();
    }
}
