pub mod config;
pub mod error;
pub mod geo;
pub mod headless;
pub mod models;
pub mod render;
pub mod session;
pub mod style;
pub mod sync;
pub mod viewport;
pub mod visibility;

pub use config::{Accuracy, ApiConfig, MapConfig, ViewportConfig, WatchOptions};
pub use error::{FetchError, Resource};
pub use geo::{Authorization, GeoPermissionGate, LocationTracker, TrackerState, TrackingHandle};
pub use models::{Category, City, Coordinate, NewPointOfInterest, PointOfInterest, UserPosition, ViewportRegion};
pub use render::RenderFrame;
pub use session::{MapSession, Notification, SessionMessage, SessionPhase};
pub use style::{CategoryStyle, CategoryStyles, Color};
pub use sync::{Backend, HttpBackend, MapData, RemoteDataSyncClient, SyncState};
pub use viewport::{MapWidget, ViewportController};
pub use visibility::{VisibleMarkers, compute_visible};
