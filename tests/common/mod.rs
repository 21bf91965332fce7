#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from poimap for tests
pub use poimap::geo::{Authorization, TrackerState};
pub use poimap::models::{Category, City, NewPointOfInterest, PointOfInterest, ViewportRegion};
pub use poimap::session::{MapSession, Notification, SessionMessage, SessionPhase};
pub use poimap::sync::{MapData, RemoteDataSyncClient, SyncState};
pub use poimap::viewport::ViewportController;
pub use poimap::visibility::{CITY_LABEL_OPACITY, FADED_CITY_LABEL_OPACITY, compute_visible};
