use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::StreamExt;
use poimap::config::{Accuracy, WatchOptions};
use poimap::error::{FetchError, Resource, Result as FetchResult};
use poimap::geo::{Authorization, Fix, FixStream, GeoPermissionGate, LocationTracker, PermissionProvider, PositionSensor};
use poimap::models::{Category, City, NewPointOfInterest, PointOfInterest, ViewportRegion};
use poimap::render::RenderFrame;
use poimap::sync::Backend;
use poimap::viewport::MapWidget;
use time::OffsetDateTime;

/// The single POI from the reference scenario.
pub fn ancient_agora() -> PointOfInterest {
    PointOfInterest {
        id: 1,
        category: Category::Tourism,
        title: "Ancient Agora".to_string(),
        latitude: 40.6379,
        longitude: 22.9459,
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}

pub fn sample_pois() -> Vec<PointOfInterest> {
    vec![
        ancient_agora(),
        PointOfInterest {
            id: 2,
            category: Category::Museums,
            title: "Archaeological Museum".to_string(),
            latitude: 40.6247,
            longitude: 22.9543,
            created_at: OffsetDateTime::UNIX_EPOCH,
        },
        PointOfInterest {
            id: 3,
            category: Category::Food,
            title: "Modiano Market".to_string(),
            latitude: 40.6366,
            longitude: 22.9405,
            created_at: OffsetDateTime::UNIX_EPOCH,
        },
    ]
}

pub fn sample_cities() -> Vec<City> {
    vec![
        City {
            id: 1,
            title: "Thessaloniki".to_string(),
            country: "Greece".to_string(),
            latitude: 40.6401,
            longitude: 22.9444,
        },
        City {
            id: 2,
            title: "Athens".to_string(),
            country: "Greece".to_string(),
            latitude: 37.9838,
            longitude: 23.7275,
        },
    ]
}

pub fn region(center_latitude: f64, center_longitude: f64, span: f64) -> ViewportRegion {
    ViewportRegion::new(center_latitude, center_longitude, span, span)
}

pub fn fix(latitude: f64, longitude: f64) -> Fix {
    Fix {
        latitude,
        longitude,
        timestamp: OffsetDateTime::now_utc(),
    }
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeBackendInner {
    locations: Mutex<Vec<PointOfInterest>>,
    cities: Mutex<Vec<City>>,
    locations_status: Mutex<Option<u16>>,
    locations_script: Mutex<VecDeque<(Duration, Option<u16>)>>,
    cities_status: Mutex<Option<u16>>,
    delay: Mutex<Duration>,
    location_calls: AtomicUsize,
    city_calls: AtomicUsize,
    created: Mutex<Vec<NewPointOfInterest>>,
}

/// In-memory backend. Clones share state so a test can keep one to tweak
/// responses after handing another to the client.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<FakeBackendInner>,
}

impl FakeBackend {
    pub fn new(locations: Vec<PointOfInterest>, cities: Vec<City>) -> Self {
        let backend = Self::default();
        backend.set_locations(locations);
        *backend.inner.cities.lock().unwrap() = cities;
        backend
    }

    pub fn set_locations(&self, locations: Vec<PointOfInterest>) {
        *self.inner.locations.lock().unwrap() = locations;
    }

    /// Make `GET /locations` answer with this status. `None` restores 200.
    pub fn fail_locations(&self, status: Option<u16>) {
        *self.inner.locations_status.lock().unwrap() = status;
    }

    /// Per-call `(delay, status)` overrides for `GET /locations`, consumed
    /// in order before falling back to the regular behavior.
    pub fn script_locations(&self, script: Vec<(Duration, Option<u16>)>) {
        *self.inner.locations_script.lock().unwrap() = script.into();
    }

    pub fn fail_cities(&self, status: Option<u16>) {
        *self.inner.cities_status.lock().unwrap() = status;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.inner.delay.lock().unwrap() = delay;
    }

    pub fn location_calls(&self) -> usize {
        self.inner.location_calls.load(Ordering::SeqCst)
    }

    pub fn city_calls(&self) -> usize {
        self.inner.city_calls.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<NewPointOfInterest> {
        self.inner.created.lock().unwrap().clone()
    }

    async fn pause(&self) {
        let delay = *self.inner.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Backend for FakeBackend {
    async fn list_locations(&self) -> FetchResult<Vec<PointOfInterest>> {
        self.inner.location_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.inner.locations_script.lock().unwrap().pop_front();
        let status = match scripted {
            Some((delay, status)) => {
                tokio::time::sleep(delay).await;
                status
            }
            None => {
                self.pause().await;
                *self.inner.locations_status.lock().unwrap()
            }
        };
        if let Some(status) = status {
            return Err(FetchError::Status {
                resource: Resource::Locations,
                status,
            });
        }
        Ok(self.inner.locations.lock().unwrap().clone())
    }

    async fn list_cities(&self) -> FetchResult<Vec<City>> {
        self.inner.city_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if let Some(status) = *self.inner.cities_status.lock().unwrap() {
            return Err(FetchError::Status {
                resource: Resource::Cities,
                status,
            });
        }
        Ok(self.inner.cities.lock().unwrap().clone())
    }

    async fn create_location(&self, location: &NewPointOfInterest) -> FetchResult<PointOfInterest> {
        let mut locations = self.inner.locations.lock().unwrap();
        let id = locations.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        let created = PointOfInterest {
            id,
            category: location.category,
            title: location.title.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            created_at: OffsetDateTime::now_utc(),
        };
        locations.push(created.clone());
        self.inner.created.lock().unwrap().push(location.clone());
        Ok(created)
    }
}

// ---------------------------------------------------------------------------
// Permission + sensor
// ---------------------------------------------------------------------------

/// Answers the prompt with a fixed value and counts how often it was shown.
/// With `answer` set to `None` the platform call itself fails.
#[derive(Clone)]
pub struct CountingPermission {
    pub answer: Option<Authorization>,
    pub prompts: Arc<AtomicUsize>,
}

impl CountingPermission {
    pub fn new(answer: Authorization) -> Self {
        Self {
            answer: Some(answer),
            prompts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            prompts: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl PermissionProvider for CountingPermission {
    async fn request_foreground_authorization(&self) -> anyhow::Result<Authorization> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.answer.ok_or_else(|| anyhow::anyhow!("permission service unavailable"))
    }
}

/// Sensor that answers the single-shot read with `first` and then plays
/// `feed`, sleeping before each fix. The subscription stays open afterwards.
#[derive(Clone)]
pub struct ScriptedSensor {
    pub first: Option<Fix>,
    pub feed: Vec<(Duration, Fix)>,
    pub reads: Arc<AtomicUsize>,
    pub watches: Arc<AtomicUsize>,
    pub watch_options: Arc<Mutex<Option<WatchOptions>>>,
    pub subscription_dropped: Arc<AtomicBool>,
}

impl ScriptedSensor {
    pub fn new(first: Option<Fix>, feed: Vec<(Duration, Fix)>) -> Self {
        Self {
            first,
            feed,
            reads: Arc::new(AtomicUsize::new(0)),
            watches: Arc::new(AtomicUsize::new(0)),
            watch_options: Arc::new(Mutex::new(None)),
            subscription_dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn still(latitude: f64, longitude: f64) -> Self {
        Self::new(Some(fix(latitude, longitude)), Vec::new())
    }
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl PositionSensor for ScriptedSensor {
    async fn current_position(&self, _accuracy: Accuracy) -> anyhow::Result<Fix> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.first.ok_or_else(|| anyhow::anyhow!("sensor unavailable"))
    }

    async fn watch_position(&self, options: WatchOptions) -> anyhow::Result<FixStream> {
        self.watches.fetch_add(1, Ordering::SeqCst);
        *self.watch_options.lock().unwrap() = Some(options);

        let guard = DropFlag(self.subscription_dropped.clone());
        let stream = futures::stream::unfold(self.feed.clone().into_iter(), |mut feed| async move {
            let (delay, fix) = feed.next()?;
            tokio::time::sleep(delay).await;
            Some((fix, feed))
        })
        .chain(futures::stream::pending())
        .map(move |fix| {
            let _keep = &guard;
            fix
        });
        Ok(stream.boxed())
    }
}

pub fn make_tracker(
    sensor: ScriptedSensor,
    answer: Authorization,
) -> (LocationTracker<CountingPermission, ScriptedSensor>, CountingPermission) {
    make_tracker_with(sensor, CountingPermission::new(answer))
}

pub fn make_tracker_with(
    sensor: ScriptedSensor,
    permission: CountingPermission,
) -> (LocationTracker<CountingPermission, ScriptedSensor>, CountingPermission) {
    let gate = Arc::new(GeoPermissionGate::new(permission.clone()));
    (LocationTracker::new(gate, sensor, WatchOptions::default()), permission)
}

// ---------------------------------------------------------------------------
// Map widget
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct WidgetLog {
    pub shown: Vec<ViewportRegion>,
    pub animations: Vec<(ViewportRegion, Duration)>,
    pub frames: Vec<RenderFrame>,
}

/// Records every call. Clones share the log.
#[derive(Clone, Default)]
pub struct RecordingWidget {
    pub log: Arc<Mutex<WidgetLog>>,
}

impl RecordingWidget {
    pub fn animations(&self) -> Vec<(ViewportRegion, Duration)> {
        self.log.lock().unwrap().animations.clone()
    }

    pub fn shown(&self) -> Vec<ViewportRegion> {
        self.log.lock().unwrap().shown.clone()
    }

    pub fn frames(&self) -> Vec<RenderFrame> {
        self.log.lock().unwrap().frames.clone()
    }

    pub fn last_frame(&self) -> Option<RenderFrame> {
        self.log.lock().unwrap().frames.last().cloned()
    }
}

impl MapWidget for RecordingWidget {
    fn show_region(&self, region: ViewportRegion) {
        self.log.lock().unwrap().shown.push(region);
    }

    fn animate_to_region(&self, region: ViewportRegion, duration: Duration) {
        self.log.lock().unwrap().animations.push((region, duration));
    }

    fn render_markers(&self, frame: &RenderFrame) {
        self.log.lock().unwrap().frames.push(frame.clone());
    }
}
