mod backend;
mod client;

pub use backend::{Backend, HttpBackend};
pub use client::{MapData, RemoteDataSyncClient, SyncState};
