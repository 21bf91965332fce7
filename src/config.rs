//! Explicit configuration handed to each component at construction.

use std::time::Duration;

pub const DEV_API_URL: &str = "http://localhost:8000";
pub const PRODUCTION_API_URL: &str = "https://your-production-api.com";

/// Largest page the backend will serve for a list request.
pub const MAX_LIST_LIMIT: u32 = 200;

/// Where the POI backend lives.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Sent as `?limit=` on list requests. `None` leaves the backend default.
    pub list_limit: Option<u32>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            list_limit: None,
        }
    }

    pub fn with_list_limit(mut self, limit: u32) -> Self {
        self.list_limit = Some(limit.clamp(1, MAX_LIST_LIMIT));
        self
    }

    /// Read `POIMAP_API_URL` and `POIMAP_LIST_LIMIT`, loading `.env` first.
    /// Without a URL the build profile picks the default.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let base_url = std::env::var("POIMAP_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Self::profile_default_url().to_string());
        let config = Self::new(base_url);

        match std::env::var("POIMAP_LIST_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
        {
            Some(limit) => config.with_list_limit(limit),
            None => config,
        }
    }

    pub fn profile_default_url() -> &'static str {
        if cfg!(debug_assertions) {
            DEV_API_URL
        } else {
            PRODUCTION_API_URL
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(Self::profile_default_url())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    Balanced,
    High,
}

/// Thresholds for the continuous position subscription.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    pub accuracy: Accuracy,
    pub min_interval: Duration,
    /// Meters.
    pub min_distance: f64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            accuracy: Accuracy::High,
            min_interval: Duration::from_millis(2000),
            min_distance: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    /// Span in degrees used when centering on the user or without an explicit zoom.
    pub default_span: f64,
    pub animation: Duration,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            default_span: 0.05,
            animation: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    pub api: ApiConfig,
    pub watch: WatchOptions,
    pub viewport: ViewportConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed_and_joined() {
        let config = ApiConfig::new("http://10.0.0.2:8000/");
        assert_eq!(config.base_url, "http://10.0.0.2:8000");
        assert_eq!(config.url("/locations"), "http://10.0.0.2:8000/locations");
        assert_eq!(config.url("cities"), "http://10.0.0.2:8000/cities");
    }

    #[test]
    fn list_limit_is_bounded() {
        assert_eq!(ApiConfig::new("x").with_list_limit(0).list_limit, Some(1));
        assert_eq!(ApiConfig::new("x").with_list_limit(500).list_limit, Some(200));
    }

    #[test]
    fn defaults_match_tracking_contract() {
        let watch = WatchOptions::default();
        assert_eq!(watch.accuracy, Accuracy::High);
        assert_eq!(watch.min_interval, Duration::from_millis(2000));
        assert_eq!(watch.min_distance, 5.0);

        let viewport = ViewportConfig::default();
        assert_eq!(viewport.default_span, 0.05);
        assert_eq!(viewport.animation, Duration::from_millis(1000));
    }
}
