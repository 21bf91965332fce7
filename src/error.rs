//! Error types for talking to the POI backend.

use thiserror::Error;

/// Which backend collection a request was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Locations,
    Cities,
    CreateLocation,
    Health,
}

impl Resource {
    pub fn label(self) -> &'static str {
        match self {
            Resource::Locations => "locations",
            Resource::Cities => "cities",
            Resource::CreateLocation => "create location",
            Resource::Health => "health",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure of a backend request. A fetch is all-or-nothing, so one of these
/// for either collection fails the whole sync.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("{resource} request returned HTTP {status}")]
    Status { resource: Resource, status: u16 },

    #[error("{resource} request failed: {message}")]
    Transport { resource: Resource, message: String },

    #[error("{resource} response could not be decoded: {message}")]
    Decode { resource: Resource, message: String },
}

impl FetchError {
    pub fn resource(&self) -> Resource {
        match self {
            FetchError::Status { resource, .. }
            | FetchError::Transport { resource, .. }
            | FetchError::Decode { resource, .. } => *resource,
        }
    }
}

/// Result alias for backend operations.
pub type Result<T> = std::result::Result<T, FetchError>;
