use std::sync::Arc;

use crate::session::message::Notification;
use crate::sync::MapData;
use crate::visibility::VisibleMarkers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Ready,
}

#[derive(Debug)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub data: Option<Arc<MapData>>,
    /// Last marker set handed to the widget.
    pub visible: Option<VisibleMarkers>,
    pub notifications: Vec<Notification>,
    pub disposed: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Loading,
            data: None,
            visible: None,
            notifications: Vec::new(),
            disposed: false,
        }
    }
}
