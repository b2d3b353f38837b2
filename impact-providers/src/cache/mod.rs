//! Last-known-good cache for provider responses.
//!
//! Entries are keyed by a request [`fingerprint`] and carry the time they
//! were fetched plus a time-to-live. Expiry is checked passively when an entry
//! is read; nothing sweeps the cache in the background. Expired entries are
//! kept so they can be served when the live source is down.
//!
//! Two backends are provided:
//!
//! - [`MemoryCacheBackend`]: a `RwLock<HashMap>` for a single process
//! - [`DiskCacheBackend`]: one JSON file per fingerprint, survives restarts
//!
//! [`CacheFallbackStore`] combines a backend with the live-then-cache policy.

mod disk;
mod fallback;
mod memory;

pub use disk::DiskCacheBackend;
pub use fallback::{CacheFallbackStore, CachePolicy, FallbackFailure, FetchSource, Fetched};
pub use memory::MemoryCacheBackend;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ProviderResult;

/// Parameter names that never take part in a fingerprint.
const CREDENTIAL_PARAMS: &[&str] = &["api_key", "appid", "key", "token"];

/// Stable cache key for a request.
///
/// Parameters are sorted by name so argument order does not matter, and
/// credential parameters are dropped so rotating keys still hit the same
/// entry.
///
/// ```
/// use impact_providers::cache::fingerprint;
///
/// let a = fingerprint("neo-feed", &[("start_date", "2026-10-18"), ("api_key", "DEMO_KEY")]);
/// let b = fingerprint("neo-feed", &[("api_key", "other"), ("start_date", "2026-10-18")]);
/// assert_eq!(a, b);
/// assert_eq!(a, "neo-feed?start_date=2026-10-18");
/// ```
pub fn fingerprint(namespace: &str, params: &[(&str, &str)]) -> String {
    let mut kept: Vec<(&str, &str)> = params
        .iter()
        .copied()
        .filter(|(name, _)| !CREDENTIAL_PARAMS.contains(name))
        .collect();
    kept.sort_unstable();

    let query: Vec<String> = kept
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();

    if query.is_empty() {
        namespace.to_string()
    } else {
        format!("{}?{}", namespace, query.join("&"))
    }
}

/// One stored response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub fingerprint: String,
    pub payload: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
    pub ttl_secs: u64,
}

impl CacheEntry {
    /// Entry fetched now.
    pub fn new(fingerprint: &str, payload: serde_json::Value, ttl: Duration) -> Self {
        Self {
            fingerprint: fingerprint.to_string(),
            payload,
            fetched_at: Utc::now(),
            ttl_secs: ttl.as_secs(),
        }
    }

    pub fn with_fetched_at(mut self, fetched_at: DateTime<Utc>) -> Self {
        self.fetched_at = fetched_at;
        self
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// `now - fetched_at > ttl`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let age_ms = i128::from((now - self.fetched_at).num_milliseconds());
        age_ms > i128::from(self.ttl_secs) * 1000
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// A cache read, flagged when it is past its TTL.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPayload {
    pub payload: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
    pub is_stale: bool,
}

impl CachedPayload {
    fn from_entry(entry: CacheEntry, now: DateTime<Utc>) -> Self {
        let is_stale = entry.is_expired_at(now);
        Self {
            payload: entry.payload,
            fetched_at: entry.fetched_at,
            is_stale,
        }
    }
}

/// Storage behind a [`CacheFallbackStore`].
///
/// Implementations synchronize internally; `store` is an upsert and the last
/// writer wins.
pub trait CacheBackend: Send + Sync {
    fn load(&self, fingerprint: &str) -> ProviderResult<Option<CacheEntry>>;

    fn store(&self, entry: CacheEntry) -> ProviderResult<()>;

    /// Returns whether an entry was present.
    fn remove(&self, fingerprint: &str) -> ProviderResult<bool>;

    fn clear(&self) -> ProviderResult<()>;
}
