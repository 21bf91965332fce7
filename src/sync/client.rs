use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::error::{FetchError, Result};
use crate::models::{City, NewPointOfInterest, PointOfInterest};
use crate::sync::backend::Backend;

/// Both collections from one successful fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapData {
    pub locations: Vec<PointOfInterest>,
    pub cities: Vec<City>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncState {
    Idle,
    Loading,
    Ready(Arc<MapData>),
    Failed(FetchError),
}

impl SyncState {
    pub fn data(&self) -> Option<&Arc<MapData>> {
        match self {
            SyncState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// Fetches locations and cities together. Either both arrive or the sync
/// fails as a whole; there is no retry. Only the most recently started
/// fetch may publish its outcome.
pub struct RemoteDataSyncClient<B> {
    backend: B,
    state: watch::Sender<SyncState>,
    generation: AtomicU64,
}

impl<B: Backend> RemoteDataSyncClient<B> {
    pub fn new(backend: B) -> Self {
        let (state, _) = watch::channel(SyncState::Idle);
        Self {
            backend,
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> SyncState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    /// Issue both reads concurrently and replace whatever was held before.
    pub async fn fetch_all(&self) -> Result<Arc<MapData>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(SyncState::Loading);

        let fetched = tokio::try_join!(self.backend.list_locations(), self.backend.list_cities());

        let (result, state) = match fetched {
            Ok((locations, cities)) => {
                info!("Loaded {} locations and {} cities", locations.len(), cities.len());
                let data = Arc::new(MapData { locations, cities });
                (Ok(data.clone()), SyncState::Ready(data))
            }
            Err(e) => {
                error!("Error fetching map data: {}", e);
                (Err(e.clone()), SyncState::Failed(e))
            }
        };

        if self.is_current(generation) {
            self.state.send_replace(state);
        } else {
            debug!("fetch {} superseded, not publishing", generation);
        }
        result
    }

    /// Generation number of the most recently started fetch.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Insert one location. Does not touch the held collections; call
    /// `fetch_all` to see it on the map.
    pub async fn create_location(&self, location: &NewPointOfInterest) -> Result<PointOfInterest> {
        let created = self.backend.create_location(location).await?;
        info!("Created location {} ({})", created.id, created.title);
        Ok(created)
    }
}
