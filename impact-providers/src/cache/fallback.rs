use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::{CacheBackend, CacheEntry, CachedPayload, MemoryCacheBackend};
use crate::errors::{ProviderError, ProviderResult};

/// Whether a fresh cache entry may answer without a network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Always go live first; the cache is only a fallback.
    #[default]
    PreferLive,
    /// Serve an unexpired entry directly; go live when it is missing or
    /// expired.
    PreferFreshCache,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Live,
    CacheFresh,
    /// Served after a live failure. May be past its TTL.
    CacheFallback,
}

impl fmt::Display for FetchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FetchSource::Live => "live",
            FetchSource::CacheFresh => "cache (fresh)",
            FetchSource::CacheFallback => "cache (fallback)",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub payload: serde_json::Value,
    pub source: FetchSource,
}

/// Live fetch failed and the cache could not stand in for it.
#[derive(Debug, Error)]
pub enum FallbackFailure<E> {
    #[error("live fetch failed and nothing is cached: {0}")]
    NotCached(E),

    #[error("live fetch failed ({live}) and the cache is unavailable: {cache}")]
    CacheUnavailable { live: E, cache: ProviderError },
}

impl<E> FallbackFailure<E> {
    pub fn live_error(&self) -> &E {
        match self {
            Self::NotCached(live) | Self::CacheUnavailable { live, .. } => live,
        }
    }

    pub fn into_live_error(self) -> E {
        match self {
            Self::NotCached(live) | Self::CacheUnavailable { live, .. } => live,
        }
    }
}

/// Live-then-cache orchestration over a [`CacheBackend`].
pub struct CacheFallbackStore {
    backend: Box<dyn CacheBackend>,
    policy: CachePolicy,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl fmt::Debug for CacheFallbackStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheFallbackStore")
            .field("policy", &self.policy)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl CacheFallbackStore {
    pub fn new(backend: Box<dyn CacheBackend>) -> Self {
        Self {
            backend,
            policy: CachePolicy::default(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn memory_only() -> Self {
        Self::new(Box::new(MemoryCacheBackend::new()))
    }

    pub fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Any stored entry, expired or not. `Ok(None)` means nothing is
    /// cached; `Err` means the backend could not be read.
    pub fn try_get(&self, fingerprint: &str) -> ProviderResult<Option<CachedPayload>> {
        let found = self.backend.load(fingerprint).map_err(|e| {
            self.misses.fetch_add(1, Ordering::Relaxed);
            e
        })?;

        match found {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(CachedPayload::from_entry(entry, Utc::now())))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    /// Like [`try_get`](Self::try_get), with read failures logged and
    /// reported as a miss.
    pub fn get(&self, fingerprint: &str) -> Option<CachedPayload> {
        self.try_get(fingerprint).unwrap_or_else(|e| {
            warn!(fingerprint, error = %e, "cache read failed");
            None
        })
    }

    /// Only an unexpired entry.
    pub fn get_fresh(&self, fingerprint: &str) -> Option<CachedPayload> {
        self.get(fingerprint).filter(|cached| !cached.is_stale)
    }

    /// Upserts `payload` as fetched now.
    pub fn put(
        &self,
        fingerprint: &str,
        payload: serde_json::Value,
        ttl: Duration,
    ) -> ProviderResult<()> {
        self.put_entry(CacheEntry::new(fingerprint, payload, ttl))
    }

    pub fn put_entry(&self, entry: CacheEntry) -> ProviderResult<()> {
        self.backend.store(entry)
    }

    pub fn remove(&self, fingerprint: &str) -> ProviderResult<bool> {
        self.backend.remove(fingerprint)
    }

    pub fn clear(&self) -> ProviderResult<()> {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.backend.clear()
    }

    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let total = hits + self.misses.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Runs `live` and caches its payload; serves the cached copy when it
    /// fails.
    ///
    /// With no cached copy the live error comes back unchanged inside
    /// [`FallbackFailure::NotCached`]; an unreadable cache gives
    /// [`FallbackFailure::CacheUnavailable`]. A cache write failure after a
    /// successful live call is logged and does not fail the call.
    pub fn fetch_or_fallback<E, F>(
        &self,
        fingerprint: &str,
        ttl: Duration,
        live: F,
    ) -> Result<Fetched, FallbackFailure<E>>
    where
        E: fmt::Display,
        F: FnOnce() -> Result<serde_json::Value, E>,
    {
        if self.policy == CachePolicy::PreferFreshCache {
            if let Some(cached) = self.get_fresh(fingerprint) {
                info!(fingerprint, "serving fresh cache entry");
                return Ok(Fetched {
                    payload: cached.payload,
                    source: FetchSource::CacheFresh,
                });
            }
        }

        match live() {
            Ok(payload) => {
                if let Err(e) = self.put(fingerprint, payload.clone(), ttl) {
                    warn!(fingerprint, error = %e, "failed to cache live payload");
                }
                Ok(Fetched {
                    payload,
                    source: FetchSource::Live,
                })
            }
            Err(live_error) => match self.try_get(fingerprint) {
                Ok(Some(cached)) => {
                    info!(
                        fingerprint,
                        error = %live_error,
                        stale = cached.is_stale,
                        fetched_at = %cached.fetched_at,
                        "live fetch failed, serving cached copy"
                    );
                    Ok(Fetched {
                        payload: cached.payload,
                        source: FetchSource::CacheFallback,
                    })
                }
                Ok(None) => {
                    warn!(
                        fingerprint,
                        error = %live_error,
                        "live fetch failed and nothing is cached"
                    );
                    Err(FallbackFailure::NotCached(live_error))
                }
                Err(cache_error) => {
                    warn!(
                        fingerprint,
                        error = %live_error,
                        cache_error = %cache_error,
                        "live fetch failed and the cache is unavailable"
                    );
                    Err(FallbackFailure::CacheUnavailable {
                        live: live_error,
                        cache: cache_error,
                    })
                }
            },
        }
    }
}
