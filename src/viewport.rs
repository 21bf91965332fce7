use std::time::Duration;

use tracing::debug;

use crate::config::ViewportConfig;
use crate::models::{Coordinate, UserPosition, ViewportRegion};
use crate::render::RenderFrame;

/// The map-rendering widget. Settlement flows the other way: the widget
/// reports finished gestures through [`ViewportController::on_region_settled`].
pub trait MapWidget: Send + 'static {
    /// Jump to a region without animation.
    fn show_region(&self, region: ViewportRegion);
    /// Start an animated transition. Returns immediately.
    fn animate_to_region(&self, region: ViewportRegion, duration: Duration);
    fn render_markers(&self, frame: &RenderFrame);
}

/// Tracks the authoritative visible region. Only settlement reports from the
/// widget change it; programmatic moves are requests that settle later.
pub struct ViewportController<W> {
    widget: W,
    config: ViewportConfig,
    region: Option<ViewportRegion>,
    user_position: Option<UserPosition>,
}

impl<W: MapWidget> ViewportController<W> {
    pub fn new(widget: W, config: ViewportConfig) -> Self {
        Self {
            widget,
            config,
            region: None,
            user_position: None,
        }
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// `None` until the first region has been established.
    pub fn current_region(&self) -> Option<ViewportRegion> {
        self.region
    }

    pub fn user_position(&self) -> Option<UserPosition> {
        self.user_position
    }

    pub fn set_user_position(&mut self, position: UserPosition) {
        self.user_position = Some(position);
    }

    /// Establish the starting region around `center` at the default span.
    pub fn initialize_at(&mut self, center: Coordinate) -> ViewportRegion {
        let region = ViewportRegion::centered(center, self.config.default_span);
        self.region = Some(region);
        self.widget.show_region(region);
        region
    }

    pub fn center_on(&self, latitude: f64, longitude: f64, zoom_span: f64) {
        let region = ViewportRegion::centered(Coordinate::new(latitude, longitude), zoom_span);
        self.widget.animate_to_region(region, self.config.animation);
    }

    /// `center_on` at the default span.
    pub fn navigate_to(&self, latitude: f64, longitude: f64) {
        self.center_on(latitude, longitude, self.config.default_span);
    }

    /// No-op without a known position.
    pub fn center_on_user(&self) {
        if let Some(position) = self.user_position {
            self.navigate_to(position.latitude, position.longitude);
        }
    }

    pub fn on_region_settled(&mut self, region: ViewportRegion) {
        debug!(
            "region settled at ({}, {}) span {}x{}",
            region.center_latitude, region.center_longitude, region.latitude_span, region.longitude_span
        );
        self.region = Some(region);
    }
}
