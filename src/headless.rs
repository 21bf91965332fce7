//! Stand-ins for the platform collaborators so a session can run without a
//! device or a map widget.

use std::sync::Mutex;
use std::time::Duration;

use futures::StreamExt;
use time::OffsetDateTime;
use tracing::info;

use crate::config::{Accuracy, WatchOptions};
use crate::geo::{Authorization, Fix, FixStream, PermissionProvider, PositionSensor};
use crate::models::{Coordinate, ViewportRegion};
use crate::render::RenderFrame;
use crate::session::SessionSender;
use crate::viewport::MapWidget;

/// Always answers the permission prompt the same way.
pub struct FixedPermission(pub Authorization);

impl PermissionProvider for FixedPermission {
    async fn request_foreground_authorization(&self) -> anyhow::Result<Authorization> {
        Ok(self.0)
    }
}

/// Reports the same coordinate on every read, and re-reports it on the
/// subscription once per interval.
pub struct StaticPositionSensor {
    pub coordinate: Coordinate,
}

impl StaticPositionSensor {
    fn fix(coordinate: Coordinate) -> Fix {
        Fix {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

impl PositionSensor for StaticPositionSensor {
    async fn current_position(&self, _accuracy: Accuracy) -> anyhow::Result<Fix> {
        Ok(Self::fix(self.coordinate))
    }

    async fn watch_position(&self, options: WatchOptions) -> anyhow::Result<FixStream> {
        let coordinate = self.coordinate;
        let interval = options.min_interval;
        let stream = futures::stream::unfold((), move |()| async move {
            tokio::time::sleep(interval).await;
            Some((Self::fix(coordinate), ()))
        });
        Ok(stream.boxed())
    }
}

/// Logs what it is asked to draw. Animated moves settle once the animation
/// duration has elapsed, reported through the attached session sender.
#[derive(Default)]
pub struct LoggingMapWidget {
    sender: Mutex<Option<SessionSender>>,
}

impl LoggingMapWidget {
    pub fn attach(&self, sender: SessionSender) {
        if let Ok(mut slot) = self.sender.lock() {
            *slot = Some(sender);
        }
    }

    /// Stand in for a finished user gesture.
    pub fn settle(&self, region: ViewportRegion) {
        let sender = self.sender.lock().ok().and_then(|slot| slot.clone());
        if let Some(sender) = sender {
            sender.region_settled(region);
        }
    }
}

impl MapWidget for LoggingMapWidget {
    fn show_region(&self, region: ViewportRegion) {
        info!(
            "show region ({:.4}, {:.4}) span {}",
            region.center_latitude, region.center_longitude, region.latitude_span
        );
        self.settle(region);
    }

    fn animate_to_region(&self, region: ViewportRegion, duration: Duration) {
        info!(
            "animate to ({:.4}, {:.4}) span {} over {:?}",
            region.center_latitude, region.center_longitude, region.latitude_span, duration
        );
        let sender = self.sender.lock().ok().and_then(|slot| slot.clone());
        if let Some(sender) = sender {
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                sender.region_settled(region);
            });
        }
    }

    fn render_markers(&self, frame: &RenderFrame) {
        info!("render {} cities, {} locations", frame.cities.len(), frame.pois.len());
        for city in &frame.cities {
            info!("  {} '{}' opacity {}", city.key, city.label, city.label_opacity);
        }
        for poi in &frame.pois {
            info!(
                "  {} '{}' {} {}",
                poi.key,
                poi.callout.title,
                poi.callout.subtitle,
                poi.color.to_hex()
            );
        }
    }
}
