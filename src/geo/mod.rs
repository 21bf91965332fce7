mod permission;
mod tracker;

pub use permission::{Authorization, GeoPermissionGate, PermissionProvider};
pub use tracker::{Fix, FixStream, LocationTracker, PositionSensor, TrackerState, TrackingHandle, UpdateGate};
