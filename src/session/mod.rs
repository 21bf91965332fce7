//! Hosts one mounted map: wires the tracker, the data sync and the viewport
//! together and turns their output into marker frames for the widget.

mod message;
mod state;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::geo::{LocationTracker, PermissionProvider, PositionSensor, TrackerState, TrackingHandle};
use crate::render::RenderFrame;
use crate::style::CategoryStyles;
use crate::sync::{Backend, RemoteDataSyncClient};
use crate::viewport::{MapWidget, ViewportController};
use crate::visibility::{VisibleMarkers, compute_visible};

pub use message::{Notification, SessionMessage, SessionSender};
pub use state::{SessionPhase, SessionState};

pub struct MapSession<P, S, B, W> {
    tracker: LocationTracker<P, S>,
    tracking: Option<TrackingHandle>,
    tracking_open: bool,
    fetch_generation: u64,
    sync: Arc<RemoteDataSyncClient<B>>,
    viewport: ViewportController<W>,
    styles: CategoryStyles,
    state: SessionState,
    inbox_tx: mpsc::UnboundedSender<SessionMessage>,
    inbox_rx: mpsc::UnboundedReceiver<SessionMessage>,
}

impl<P, S, B, W> MapSession<P, S, B, W>
where
    P: PermissionProvider,
    S: PositionSensor,
    B: Backend,
    W: MapWidget,
{
    pub fn new(
        tracker: LocationTracker<P, S>,
        sync: RemoteDataSyncClient<B>,
        viewport: ViewportController<W>,
        styles: CategoryStyles,
    ) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            tracker,
            tracking: None,
            tracking_open: false,
            fetch_generation: 0,
            sync: Arc::new(sync),
            viewport,
            styles,
            state: SessionState::default(),
            inbox_tx,
            inbox_rx,
        }
    }

    pub fn sender(&self) -> SessionSender {
        SessionSender::new(self.inbox_tx.clone())
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn viewport(&self) -> &ViewportController<W> {
        &self.viewport
    }

    pub fn sync(&self) -> &RemoteDataSyncClient<B> {
        &self.sync
    }

    pub fn tracker_state(&self) -> TrackerState {
        self.tracker.state()
    }

    /// Last marker set computed for the widget.
    pub fn visible(&self) -> Option<&VisibleMarkers> {
        self.state.visible.as_ref()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.state.notifications)
    }

    /// Start tracking and fetching in parallel.
    pub fn mount(&mut self) {
        if self.tracking.is_some() || self.state.disposed {
            return;
        }
        info!("mounting map session");
        self.tracking = Some(self.tracker.start());
        self.tracking_open = true;
        self.spawn_fetch();
    }

    /// Stop tracking. Results of fetches still in flight are dropped.
    pub fn teardown(&mut self) {
        if self.state.disposed {
            return;
        }
        if let Some(mut handle) = self.tracking.take() {
            handle.stop();
        }
        self.tracking_open = false;
        self.state.disposed = true;
        info!("map session torn down");
    }

    /// Start a fetch that supersedes any still in flight.
    fn spawn_fetch(&mut self) {
        self.fetch_generation += 1;
        let generation = self.fetch_generation;
        let sync = self.sync.clone();
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let result = sync.fetch_all().await;
            // The session may be gone by now.
            let _ = tx.send(SessionMessage::DataLoaded { generation, result });
        });
    }

    /// Wait for the next position or inbox message. `None` after teardown.
    pub async fn next_message(&mut self) -> Option<SessionMessage> {
        if self.state.disposed {
            return None;
        }
        match self.tracking.as_mut() {
            Some(handle) if self.tracking_open => tokio::select! {
                message = self.inbox_rx.recv() => message,
                position = handle.next() => Some(match position {
                    Some(position) => SessionMessage::PositionUpdated(position),
                    None => SessionMessage::TrackingEnded,
                }),
            },
            _ => self.inbox_rx.recv().await,
        }
    }

    /// Handle one message. Returns false once the session is disposed.
    pub async fn process_next(&mut self) -> bool {
        match self.next_message().await {
            Some(message) => {
                self.update(message);
                true
            }
            None => false,
        }
    }

    pub fn update(&mut self, message: SessionMessage) {
        if self.state.disposed {
            debug!("ignoring {:?} after teardown", message);
            return;
        }
        match message {
            SessionMessage::PositionUpdated(position) => {
                self.viewport.set_user_position(position);
                self.try_become_ready();
            }
            SessionMessage::TrackingEnded => {
                self.tracking_open = false;
                let denied = self
                    .tracking
                    .as_ref()
                    .is_some_and(|handle| handle.state() == TrackerState::Denied);
                if denied {
                    self.notify(Notification::PermissionDenied);
                }
            }
            SessionMessage::DataLoaded { generation, .. } if generation != self.fetch_generation => {
                debug!(
                    "dropping result of fetch {} (latest is {})",
                    generation, self.fetch_generation
                );
            }
            SessionMessage::DataLoaded { result: Ok(data), .. } => {
                self.state.data = Some(data);
                if self.state.phase == SessionPhase::Ready {
                    self.render();
                } else {
                    self.try_become_ready();
                }
            }
            SessionMessage::DataLoaded { result: Err(e), .. } => {
                self.state.data = None;
                self.state.phase = SessionPhase::Loading;
                if self.state.visible.take().is_some() {
                    self.viewport.widget().render_markers(&RenderFrame::default());
                }
                self.notify(Notification::FetchFailed(e));
            }
            SessionMessage::RegionSettled(region) => {
                self.viewport.on_region_settled(region);
                if self.state.phase == SessionPhase::Ready {
                    self.render();
                }
            }
            SessionMessage::CenterOnUser => self.viewport.center_on_user(),
            SessionMessage::CenterOn {
                latitude,
                longitude,
                zoom_span,
            } => match zoom_span {
                Some(span) => self.viewport.center_on(latitude, longitude, span),
                None => self.viewport.navigate_to(latitude, longitude),
            },
            SessionMessage::Refresh => self.spawn_fetch(),
        }
    }

    fn try_become_ready(&mut self) {
        if self.state.phase == SessionPhase::Ready || self.state.data.is_none() {
            return;
        }
        let Some(position) = self.viewport.user_position() else {
            return;
        };
        if self.viewport.current_region().is_none() {
            self.viewport.initialize_at(position.coordinate());
        }
        self.state.phase = SessionPhase::Ready;
        info!("map ready at ({}, {})", position.latitude, position.longitude);
        self.render();
    }

    fn render(&mut self) {
        let (Some(region), Some(data)) = (self.viewport.current_region(), self.state.data.as_ref()) else {
            return;
        };
        let visible = compute_visible(&region, &data.locations, &data.cities);
        let frame = RenderFrame::build(&visible, &self.styles);
        debug!(
            "rendering {} cities and {} locations",
            frame.cities.len(),
            frame.pois.len()
        );
        self.viewport.widget().render_markers(&frame);
        self.state.visible = Some(visible);
    }

    fn notify(&mut self, notification: Notification) {
        warn!("notification: {:?}", notification);
        self.state.notifications.push(notification);
    }
}
