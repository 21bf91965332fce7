use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::FetchError;
use crate::models::{UserPosition, ViewportRegion};
use crate::sync::MapData;

#[derive(Debug)]
pub enum SessionMessage {
    PositionUpdated(UserPosition),
    /// The position stream closed: denied, sensor gone, or stopped.
    TrackingEnded,
    /// Outcome of the fetch with this generation. Only the latest counts.
    DataLoaded {
        generation: u64,
        result: Result<Arc<MapData>, FetchError>,
    },
    RegionSettled(ViewportRegion),
    CenterOnUser,
    CenterOn {
        latitude: f64,
        longitude: f64,
        zoom_span: Option<f64>,
    },
    Refresh,
}

/// Raised once per occurrence for the surrounding UI to show.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    PermissionDenied,
    FetchFailed(FetchError),
}

/// Cloneable inbox for the widget and host to feed a session.
#[derive(Debug, Clone)]
pub struct SessionSender {
    tx: mpsc::UnboundedSender<SessionMessage>,
}

impl SessionSender {
    pub(super) fn new(tx: mpsc::UnboundedSender<SessionMessage>) -> Self {
        Self { tx }
    }

    /// Returns false once the session is gone.
    pub fn send(&self, message: SessionMessage) -> bool {
        self.tx.send(message).is_ok()
    }

    pub fn region_settled(&self, region: ViewportRegion) -> bool {
        self.send(SessionMessage::RegionSettled(region))
    }

    pub fn center_on_user(&self) -> bool {
        self.send(SessionMessage::CenterOnUser)
    }

    pub fn refresh(&self) -> bool {
        self.send(SessionMessage::Refresh)
    }
}
