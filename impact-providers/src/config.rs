//! Provider configuration.
//!
//! Three sources, all producing the same [`ProviderConfig`]:
//!
//! - [`ProviderConfig::from_env`]: the process environment
//! - [`ProviderConfig::from_json_file`]: a JSON document; missing fields take defaults
//! - [`ProviderConfig::builder`]: code
//!
//! No credential has a compiled-in value except the public NASA `DEMO_KEY`.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `GEMINI_API_KEY_1` .. `GEMINI_API_KEY_4` | `generative_keys` |
//! | `OPENWEATHER_KEY_1` .. `OPENWEATHER_KEY_4` | `weather_keys` |
//! | `GOOGLE_MAPS_API_KEY` | `google_maps_key` |
//! | `NASA_API_KEY` | `nasa_api_key` |
//! | `GEMINI_MODEL` | `gemini_model` |
//! | `NOMINATIM_UA` | `nominatim_user_agent` |
//! | `IMPACT_CACHE_DIR` | `cache_dir` |

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheFallbackStore, CachePolicy, DiskCacheBackend};
use crate::errors::{ProviderError, ProviderResult};
use crate::keyring::ProviderKeyRing;

pub const DEFAULT_NASA_API_KEY: &str = "DEMO_KEY";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_FEED_TTL_SECS: u64 = 12 * 3600;

const KEY_SLOTS: usize = 4;

/// Per-provider request timeouts in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub weather_secs: u64,
    pub elevation_secs: u64,
    pub geocode_secs: u64,
    pub feed_secs: u64,
    pub generative_secs: u64,
    pub seismic_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            weather_secs: 7,
            elevation_secs: 5,
            geocode_secs: 6,
            feed_secs: 10,
            generative_secs: 30,
            seismic_secs: 10,
        }
    }
}

impl Timeouts {
    fn all(&self) -> [(&'static str, u64); 6] {
        [
            ("weather", self.weather_secs),
            ("elevation", self.elevation_secs),
            ("geocode", self.geocode_secs),
            ("feed", self.feed_secs),
            ("generative", self.generative_secs),
            ("seismic", self.seismic_secs),
        ]
    }
}

/// Base URLs. Overridable so tests can point clients at a mock server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub weather: String,
    pub generative: String,
    pub usgs_elevation: String,
    pub google_elevation: String,
    pub neo_feed: String,
    pub nominatim: String,
    pub seismic: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            weather: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            generative: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            usgs_elevation: "https://epqs.nationalmap.gov/v1/json".to_string(),
            google_elevation: "https://maps.googleapis.com/maps/api/elevation/json".to_string(),
            neo_feed: "https://api.nasa.gov/neo/rest/v1/feed".to_string(),
            nominatim: "https://nominatim.openstreetmap.org/reverse".to_string(),
            seismic: "https://earthquake.usgs.gov/fdsnws/event/1/query".to_string(),
        }
    }
}

impl Endpoints {
    /// Every endpoint rooted at `base`, with the default paths kept. Used to
    /// aim all clients at one mock server.
    pub fn rooted_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            weather: format!("{}/data/2.5/weather", base),
            generative: format!("{}/v1beta", base),
            usgs_elevation: format!("{}/v1/json", base),
            google_elevation: format!("{}/maps/api/elevation/json", base),
            neo_feed: format!("{}/neo/rest/v1/feed", base),
            nominatim: format!("{}/reverse", base),
            seismic: format!("{}/fdsnws/event/1/query", base),
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub generative_keys: Vec<String>,
    pub weather_keys: Vec<String>,
    pub google_maps_key: Option<String>,
    pub nasa_api_key: String,
    pub gemini_model: String,
    pub nominatim_user_agent: String,
    pub cache_dir: Option<PathBuf>,
    pub feed_ttl_secs: u64,
    pub cache_policy: CachePolicy,
    pub timeouts: Timeouts,
    pub endpoints: Endpoints,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            generative_keys: Vec::new(),
            weather_keys: Vec::new(),
            google_maps_key: None,
            nasa_api_key: DEFAULT_NASA_API_KEY.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            nominatim_user_agent: crate::http::default_user_agent(),
            cache_dir: None,
            feed_ttl_secs: DEFAULT_FEED_TTL_SECS,
            cache_policy: CachePolicy::PreferLive,
            timeouts: Timeouts::default(),
            endpoints: Endpoints::default(),
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("generative_keys", &self.generative_keys.len())
            .field("weather_keys", &self.weather_keys.len())
            .field("google_maps_key", &self.google_maps_key.is_some())
            .field("gemini_model", &self.gemini_model)
            .field("nominatim_user_agent", &self.nominatim_user_agent)
            .field("cache_dir", &self.cache_dir)
            .field("feed_ttl_secs", &self.feed_ttl_secs)
            .field("cache_policy", &self.cache_policy)
            .field("timeouts", &self.timeouts)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl ProviderConfig {
    pub fn builder() -> ProviderConfigBuilder {
        ProviderConfigBuilder::new()
    }

    pub fn from_env() -> ProviderResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> ProviderResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let slots = |prefix: &str| -> Vec<String> {
            (1..=KEY_SLOTS)
                .filter_map(|i| lookup(&format!("{}{}", prefix, i)))
                .collect()
        };
        config.generative_keys = slots("GEMINI_API_KEY_");
        config.weather_keys = slots("OPENWEATHER_KEY_");
        config.google_maps_key = lookup("GOOGLE_MAPS_API_KEY");

        if let Some(key) = lookup("NASA_API_KEY") {
            config.nasa_api_key = key;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            config.gemini_model = model;
        }
        if let Some(ua) = lookup("NOMINATIM_UA") {
            config.nominatim_user_agent = ua;
        }
        if let Some(dir) = lookup("IMPACT_CACHE_DIR") {
            config.cache_dir = Some(PathBuf::from(dir));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ProviderResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> ProviderResult<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| ProviderError::configuration(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ProviderResult<()> {
        for (name, secs) in self.timeouts.all() {
            if secs == 0 {
                return Err(ProviderError::configuration(format!(
                    "{} timeout must be at least one second",
                    name
                )));
            }
        }
        if self.feed_ttl_secs == 0 {
            return Err(ProviderError::configuration("feed TTL must be positive"));
        }
        if self.gemini_model.trim().is_empty() {
            return Err(ProviderError::configuration("gemini model must not be empty"));
        }
        if self.nominatim_user_agent.trim().is_empty() {
            return Err(ProviderError::configuration(
                "a user agent is required by the Nominatim usage policy",
            ));
        }
        Ok(())
    }

    pub fn generative_ring(&self) -> ProviderKeyRing {
        ProviderKeyRing::new("generative", &self.generative_keys)
    }

    pub fn weather_ring(&self) -> ProviderKeyRing {
        ProviderKeyRing::new("weather", &self.weather_keys)
    }

    pub fn nasa_ring(&self) -> ProviderKeyRing {
        ProviderKeyRing::new("nasa", [&self.nasa_api_key])
    }

    pub fn feed_ttl(&self) -> Duration {
        Duration::from_secs(self.feed_ttl_secs)
    }

    /// Disk-backed when `cache_dir` is set, in-memory otherwise.
    pub fn cache_store(&self) -> ProviderResult<CacheFallbackStore> {
        let store = match &self.cache_dir {
            Some(dir) => CacheFallbackStore::new(Box::new(DiskCacheBackend::new(dir)?)),
            None => CacheFallbackStore::memory_only(),
        };
        Ok(store.with_policy(self.cache_policy))
    }
}

pub struct ProviderConfigBuilder {
    config: ProviderConfig,
}

impl ProviderConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ProviderConfig::default(),
        }
    }

    pub fn with_generative_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.generative_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_weather_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.weather_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_google_maps_key(mut self, key: impl Into<String>) -> Self {
        self.config.google_maps_key = Some(key.into());
        self
    }

    pub fn with_nasa_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.nasa_api_key = key.into();
        self
    }

    pub fn with_gemini_model(mut self, model: impl Into<String>) -> Self {
        self.config.gemini_model = model.into();
        self
    }

    pub fn with_nominatim_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.nominatim_user_agent = user_agent.into();
        self
    }

    pub fn with_cache_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.cache_dir = Some(dir.into());
        self
    }

    pub fn with_feed_ttl(mut self, ttl: Duration) -> Self {
        self.config.feed_ttl_secs = ttl.as_secs();
        self
    }

    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.config.cache_policy = policy;
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.config.timeouts = timeouts;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.config.endpoints = endpoints;
        self
    }

    pub fn build(self) -> ProviderResult<ProviderConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ProviderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
