//! Resilient access to the external data sources of the impact engine.
//!
//! Every call goes through the same three pieces:
//!
//! | Piece | Role |
//! |-------|------|
//! | [`ProviderKeyRing`] | Ordered credentials for one provider; placeholders are skipped |
//! | [`fetch_with_fallback`] / [`fetch_with_tiers`] | Try each key or tier until one succeeds |
//! | [`CacheFallbackStore`] | Serve the last good response when every live attempt fails |
//!
//! The [`providers`] module builds typed clients (weather, elevation,
//! geocoding, NEO feed, seismic history, generative text) on top of these,
//! all configured from one [`ProviderConfig`].
//!
//! # Quick Start
//!
//! ```
//! use impact_providers::{fetch_with_fallback, default_classify, AttemptError, ProviderKeyRing};
//!
//! let ring = ProviderKeyRing::new("weather", ["PLACEHOLDER", "rate-limited", "good"]);
//! let reading = fetch_with_fallback(
//!     &ring,
//!     |key| match key.as_str() {
//!         "rate-limited" => Err(AttemptError::status(429, "Too Many Requests")),
//!         _ => Ok(27.5),
//!     },
//!     default_classify,
//! )
//! .unwrap();
//! assert_eq!(reading, 27.5);
//! ```
//!
//! # Errors
//!
//! Exhaustion is reported as [`ProviderError::AllProvidersExhausted`], which
//! callers are expected to recover from (for elevation the engine assumes sea
//! level). Raw HTTP and decode failures never escape as panics.

pub mod cache;
pub mod config;
pub mod errors;
pub mod fetcher;
pub mod http;
pub mod keyring;
pub mod providers;

pub use cache::{
    fingerprint, CacheBackend, CacheEntry, CacheFallbackStore, CachePolicy, CachedPayload,
    DiskCacheBackend, FallbackFailure, FetchSource, Fetched, MemoryCacheBackend,
};
pub use config::{Endpoints, ProviderConfig, ProviderConfigBuilder, Timeouts};
pub use errors::{AttemptError, ProviderError, ProviderResult};
pub use fetcher::{
    default_classify, fetch_with_fallback, fetch_with_tiers, rotate_on_any, FailureClass,
};
pub use keyring::{KeyCursor, ProviderKey, ProviderKeyRing, PLACEHOLDER_MARKER};
pub use providers::{
    ElevationClient, GenerativeClient, GeocodeClient, NeoFeedClient, SeismicClient, SeismicQuery,
    WeatherClient,
};
