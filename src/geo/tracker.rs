use std::{future::Future, sync::Arc};

use futures::{StreamExt, stream::BoxStream};
use time::OffsetDateTime;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::Instant,
};
use tracing::{debug, info, warn};

use crate::config::{Accuracy, WatchOptions};
use crate::geo::permission::{Authorization, GeoPermissionGate, PermissionProvider};
use crate::models::{Coordinate, UserPosition};

/// A raw reading from the platform sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: OffsetDateTime,
}

impl Fix {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

impl From<Fix> for UserPosition {
    fn from(fix: Fix) -> Self {
        UserPosition {
            latitude: fix.latitude,
            longitude: fix.longitude,
            captured_at: fix.timestamp,
        }
    }
}

/// Continuous subscription. Dropping the stream removes the subscription.
pub type FixStream = BoxStream<'static, Fix>;

/// Platform position sensor.
pub trait PositionSensor: Send + Sync + 'static {
    fn current_position(&self, accuracy: Accuracy) -> impl Future<Output = anyhow::Result<Fix>> + Send;
    fn watch_position(&self, options: WatchOptions) -> impl Future<Output = anyhow::Result<FixStream>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Uninitialized,
    Authorizing,
    Denied,
    Tracking,
    Stopped,
}

/// Drops subscription updates until both the interval and the displacement
/// since the last emitted position have been reached.
#[derive(Debug, Clone)]
pub struct UpdateGate {
    options: WatchOptions,
    last: Option<(Instant, Coordinate)>,
}

impl UpdateGate {
    pub fn new(options: WatchOptions) -> Self {
        Self { options, last: None }
    }

    /// Returns true and remembers the update when it may be emitted.
    pub fn admit(&mut self, at: Instant, coordinate: Coordinate) -> bool {
        if let Some((last_at, last_coordinate)) = self.last {
            let elapsed = at.saturating_duration_since(last_at);
            let moved = last_coordinate.distance_to(&coordinate);
            if elapsed < self.options.min_interval || moved < self.options.min_distance {
                return false;
            }
        }
        self.last = Some((at, coordinate));
        true
    }
}

pub struct LocationTracker<P, S> {
    permission: Arc<GeoPermissionGate<P>>,
    sensor: Arc<S>,
    options: WatchOptions,
    /// State of the most recent run. Each `start` gets its own channel so an
    /// older handle can't overwrite a newer run's state.
    current: watch::Sender<Option<Arc<watch::Sender<TrackerState>>>>,
}

impl<P: PermissionProvider, S: PositionSensor> LocationTracker<P, S> {
    pub fn new(permission: Arc<GeoPermissionGate<P>>, sensor: S, options: WatchOptions) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            permission,
            sensor: Arc::new(sensor),
            options,
            current,
        }
    }

    /// State of the latest run, `Uninitialized` before the first `start`.
    pub fn state(&self) -> TrackerState {
        self.current
            .borrow()
            .as_ref()
            .map_or(TrackerState::Uninitialized, |state| *state.borrow())
    }

    /// Begin producing positions. The first one comes from a single-shot
    /// read, the rest from the continuous subscription. When permission is
    /// denied the returned handle yields nothing.
    pub fn start(&self) -> TrackingHandle {
        let (state, _) = watch::channel(TrackerState::Authorizing);
        let state = Arc::new(state);
        self.current.send_replace(Some(state.clone()));
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run_tracking(
            self.permission.clone(),
            self.sensor.clone(),
            self.options,
            state.clone(),
            tx,
        ));

        TrackingHandle {
            positions: rx,
            state,
            task: Some(task),
        }
    }
}

async fn run_tracking<P: PermissionProvider, S: PositionSensor>(
    permission: Arc<GeoPermissionGate<P>>,
    sensor: Arc<S>,
    options: WatchOptions,
    state: Arc<watch::Sender<TrackerState>>,
    tx: mpsc::UnboundedSender<UserPosition>,
) {
    if permission.request_authorization().await == Authorization::Denied {
        state.send_replace(TrackerState::Denied);
        return;
    }
    state.send_replace(TrackerState::Tracking);

    let mut gate = UpdateGate::new(options);

    match sensor.current_position(Accuracy::High).await {
        Ok(fix) => {
            gate.admit(Instant::now(), fix.coordinate());
            if tx.send(fix.into()).is_err() {
                return;
            }
        }
        Err(e) => warn!("single-shot position read failed: {e:#}"),
    }

    let mut fixes = match sensor.watch_position(options).await {
        Ok(fixes) => fixes,
        Err(e) => {
            warn!("position subscription failed: {e:#}");
            return;
        }
    };
    info!(
        "watching position (min interval {:?}, min distance {} m)",
        options.min_interval, options.min_distance
    );

    while let Some(fix) = fixes.next().await {
        if !gate.admit(Instant::now(), fix.coordinate()) {
            debug!("suppressed position update at ({}, {})", fix.latitude, fix.longitude);
            continue;
        }
        if tx.send(fix.into()).is_err() {
            break;
        }
    }
}

/// Owner's side of a running tracker. `stop` is the only way to cancel the
/// subscription; dropping the handle stops it as well.
pub struct TrackingHandle {
    positions: mpsc::UnboundedReceiver<UserPosition>,
    state: Arc<watch::Sender<TrackerState>>,
    task: Option<JoinHandle<()>>,
}

impl TrackingHandle {
    /// Next position in arrival order. `None` once tracking has ended,
    /// whether through denial, sensor failure or `stop`.
    pub async fn next(&mut self) -> Option<UserPosition> {
        self.positions.recv().await
    }

    pub fn try_next(&mut self) -> Option<UserPosition> {
        self.positions.try_recv().ok()
    }

    pub fn state(&self) -> TrackerState {
        *self.state.borrow()
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        task.abort();
        self.positions.close();
        self.state.send_if_modified(|state| match state {
            TrackerState::Authorizing | TrackerState::Tracking => {
                *state = TrackerState::Stopped;
                true
            }
            _ => false,
        });
        info!("location tracking stopped");
    }
}

impl Drop for TrackingHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
