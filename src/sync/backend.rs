//! Transport to the POI backend.

use std::future::Future;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::ApiConfig;
use crate::error::{FetchError, Resource, Result};
use crate::models::{City, NewPointOfInterest, PointOfInterest};

/// Read and write operations the map needs from the backend.
pub trait Backend: Send + Sync + 'static {
    fn list_locations(&self) -> impl Future<Output = Result<Vec<PointOfInterest>>> + Send;
    fn list_cities(&self) -> impl Future<Output = Result<Vec<City>>> + Send;
    fn create_location(&self, location: &NewPointOfInterest) -> impl Future<Output = Result<PointOfInterest>> + Send;
}

/// [`Backend`] over HTTP/JSON.
pub struct HttpBackend {
    client: Client,
    config: ApiConfig,
}

impl HttpBackend {
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `GET /healthz`, expecting `{"status": "ok"}`.
    pub async fn health(&self) -> Result<()> {
        let body: serde_json::Value = self.get_json(Resource::Health, "healthz", false).await?;
        match body.get("status").and_then(|s| s.as_str()) {
            Some("ok") => Ok(()),
            other => Err(FetchError::Decode {
                resource: Resource::Health,
                message: format!("unexpected status field: {:?}", other),
            }),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: Resource, path: &str, paged: bool) -> Result<T> {
        let mut req = self.client.get(self.config.url(path));
        if paged {
            if let Some(limit) = self.config.list_limit {
                req = req.query(&[("limit", limit)]);
            }
        }

        let resp = req.send().await.map_err(|e| {
            warn!("{} request unreachable: {}", resource, e);
            FetchError::Transport {
                resource,
                message: e.to_string(),
            }
        })?;

        if resp.status() != StatusCode::OK {
            warn!("{} request non-OK: {}", resource, resp.status());
            return Err(FetchError::Status {
                resource,
                status: resp.status().as_u16(),
            });
        }

        resp.json().await.map_err(|e| {
            warn!("{} response JSON parse failed: {}", resource, e);
            FetchError::Decode {
                resource,
                message: e.to_string(),
            }
        })
    }
}

impl Backend for HttpBackend {
    async fn list_locations(&self) -> Result<Vec<PointOfInterest>> {
        self.get_json(Resource::Locations, "locations", true).await
    }

    async fn list_cities(&self) -> Result<Vec<City>> {
        self.get_json(Resource::Cities, "cities", true).await
    }

    async fn create_location(&self, location: &NewPointOfInterest) -> Result<PointOfInterest> {
        let resource = Resource::CreateLocation;
        let resp = self
            .client
            .post(self.config.url("locations"))
            .json(location)
            .send()
            .await
            .map_err(|e| {
                warn!("{} request unreachable: {}", resource, e);
                FetchError::Transport {
                    resource,
                    message: e.to_string(),
                }
            })?;

        if !resp.status().is_success() {
            warn!("{} request non-OK: {}", resource, resp.status());
            return Err(FetchError::Status {
                resource,
                status: resp.status().as_u16(),
            });
        }

        resp.json().await.map_err(|e| FetchError::Decode {
            resource,
            message: e.to_string(),
        })
    }
}
