//! Simulated location provider
//!
//! Replays a fixed route of waypoints on a tokio interval, as a stand-in for
//! device hardware in development and tests.
//!
//! The desired accuracy is shared with the running task through a watch
//! channel and read on every tick, so a change applies to the next fix.

use std::sync::Arc;
use std::time::Duration;

use application::LocationError;
use application::ports::{
    LocationEvent, LocationEventSender, LocationProviderPort, ProviderEvent, UpdateRun,
};
use chrono::Utc;
use domain::{Coordinate, DesiredAccuracy, Location};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SimulationAppConfig;

/// Permission level the simulated user has granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionGrant {
    /// No permission request has been made
    #[default]
    NotDetermined,
    /// Foreground access only
    WhenInUse,
    /// Foreground and background access
    Always,
    /// Access refused
    Denied,
}

#[derive(Debug, Default)]
struct SimulatorState {
    task: Option<JoinHandle<()>>,
    /// Run the current task tags its events with
    run: UpdateRun,
    permission: PermissionGrant,
}

/// Location provider that loops over a configured route
#[derive(Debug)]
pub struct SimulatedLocationProvider {
    route: Arc<[Coordinate]>,
    interval: Duration,
    accuracy_floor: f64,
    deny_permission: bool,
    events: LocationEventSender,
    runtime: Handle,
    accuracy: watch::Sender<DesiredAccuracy>,
    state: Mutex<SimulatorState>,
}

impl SimulatedLocationProvider {
    /// Create a provider that reports through `events`
    ///
    /// Must be called from within a tokio runtime; update tasks are spawned
    /// onto that runtime even when commands arrive from other threads.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Configuration`] if a waypoint is invalid or no
    /// tokio runtime is running.
    pub fn new(
        config: &SimulationAppConfig,
        events: LocationEventSender,
    ) -> Result<Self, LocationError> {
        let route = config
            .route
            .iter()
            .map(|waypoint| waypoint.to_coordinate())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LocationError::Configuration(format!("simulation.route: {e}")))?;
        let runtime = Handle::try_current()
            .map_err(|e| LocationError::Configuration(format!("simulated provider: {e}")))?;

        Ok(Self {
            route: route.into(),
            interval: Duration::from_millis(config.interval_ms.max(1)),
            accuracy_floor: config.accuracy_meters,
            deny_permission: config.deny_permission,
            events,
            runtime,
            accuracy: watch::channel(DesiredAccuracy::default()).0,
            state: Mutex::new(SimulatorState::default()),
        })
    }

    /// Permission level granted so far
    pub fn permission(&self) -> PermissionGrant {
        self.state.lock().permission
    }

    /// Accuracy most recently configured
    pub fn accuracy(&self) -> DesiredAccuracy {
        *self.accuracy.borrow()
    }

    /// Whether the update task is running
    pub fn is_running(&self) -> bool {
        self.state
            .lock()
            .task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    fn emit(&self, run: UpdateRun, event: LocationEvent) {
        if self.events.send(ProviderEvent::new(run, event)).is_err() {
            debug!("Location event receiver dropped");
        }
    }
}

/// Horizontal accuracy reported for fixes at the given level
///
/// The simulated hardware cannot do better than its floor; coarser levels
/// report their own radius.
fn reported_accuracy(accuracy: DesiredAccuracy, floor: f64) -> f64 {
    accuracy
        .radius_meters()
        .map_or(floor, |radius| radius.max(floor))
}

impl LocationProviderPort for SimulatedLocationProvider {
    fn request_permission(&self, background: bool) {
        let mut state = self.state.lock();
        state.permission = match (self.deny_permission, background, state.permission) {
            (true, _, _) => PermissionGrant::Denied,
            (false, true, _) | (false, false, PermissionGrant::Always) => PermissionGrant::Always,
            (false, false, _) => PermissionGrant::WhenInUse,
        };
        info!(background, permission = ?state.permission, "Simulated permission request");
    }

    fn configure_accuracy(&self, accuracy: DesiredAccuracy) {
        self.accuracy.send_replace(accuracy);
        debug!(%accuracy, "Simulated accuracy configured");
    }

    fn start_continuous_updates(&self, run: UpdateRun) {
        let mut state = self.state.lock();
        if let Some(task) = state.task.take() {
            if state.run == run && !task.is_finished() {
                debug!(run = run.id(), "Simulated updates already running");
                state.task = Some(task);
                return;
            }
            task.abort();
        }
        state.run = run;

        if self.deny_permission {
            state.permission = PermissionGrant::Denied;
            warn!("Simulated provider refusing updates: permission denied");
            self.emit(
                run,
                LocationEvent::Failed(LocationError::PermissionDenied(
                    "location access denied by user".to_string(),
                )),
            );
            return;
        }
        if self.route.is_empty() {
            self.emit(
                run,
                LocationEvent::Failed(LocationError::ProviderUnavailable(
                    "simulation route is empty".to_string(),
                )),
            );
            return;
        }

        let route = Arc::clone(&self.route);
        let events = self.events.clone();
        let interval = self.interval;
        let floor = self.accuracy_floor;
        let accuracy = self.accuracy.subscribe();

        info!(
            waypoints = route.len(),
            ?interval,
            run = run.id(),
            "Starting simulated location updates"
        );
        state.task = Some(self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            for coordinate in route.iter().cycle() {
                ticker.tick().await;
                let level = *accuracy.borrow();
                let fix = Location::from(*coordinate)
                    .with_timestamp(Utc::now())
                    .with_horizontal_accuracy(reported_accuracy(level, floor));
                let event = ProviderEvent::new(run, LocationEvent::LocationsUpdated(vec![fix]));
                if events.send(event).is_err() {
                    debug!("Location event receiver dropped, stopping simulation");
                    break;
                }
            }
        }));
    }

    fn stop_continuous_updates(&self) {
        if let Some(task) = self.state.lock().task.take() {
            task.abort();
            info!("Stopped simulated location updates");
        }
    }
}

impl Drop for SimulatedLocationProvider {
    fn drop(&mut self) {
        if let Some(task) = self.state.get_mut().task.take() {
            task.abort();
        }
    }
}
