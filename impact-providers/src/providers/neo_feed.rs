use std::time::Duration;

use chrono::{Local, NaiveDate};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{number_field, round_to};
use crate::cache::{fingerprint, CacheFallbackStore, FetchSource};
use crate::config::ProviderConfig;
use crate::errors::{ProviderError, ProviderResult};
use crate::fetcher::{default_classify, fetch_with_fallback};
use crate::http::{build_client, default_user_agent, send_json};
use crate::keyring::ProviderKeyRing;

/// Length of the close-approach window requested from the feed.
pub const FEED_WINDOW_DAYS: u64 = 7;

const NAMESPACE: &str = "neo-feed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeoSummary {
    pub id: String,
    pub name: String,
    /// Mean of the published minimum and maximum estimates, 2 dp.
    pub diameter_m: Option<f64>,
    /// Relative velocity at the first listed close approach, 2 dp.
    pub velocity_km_s: f64,
    pub is_hazardous: bool,
}

impl NeoSummary {
    fn from_object(neo: &Value) -> Option<Self> {
        let id = neo.get("id").and_then(Value::as_str)?.to_string();
        let name = neo.get("name").and_then(Value::as_str)?.to_string();

        let diameter_m = match neo.pointer("/estimated_diameter/meters") {
            Some(meters) => {
                let min = meters.get("estimated_diameter_min");
                let max = meters.get("estimated_diameter_max");
                match (min, max) {
                    (Some(min), Some(max)) if !min.is_null() && !max.is_null() => {
                        Some(round_to((number_field(min)? + number_field(max)?) / 2.0, 2))
                    }
                    _ => None,
                }
            }
            None => None,
        };

        let velocity_km_s = match neo.get("close_approach_data") {
            None => 0.0,
            Some(approaches) => {
                let first = approaches.as_array()?.first()?;
                match first.pointer("/relative_velocity/kilometers_per_second") {
                    Some(v) => number_field(v)?,
                    None => 0.0,
                }
            }
        };

        Some(Self {
            id,
            name,
            diameter_m,
            velocity_km_s: round_to(velocity_km_s, 2),
            is_hazardous: neo
                .get("is_potentially_hazardous_asteroid")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }
}

/// Flattens a NeoWs feed document. Malformed objects are skipped.
pub fn parse_feed(payload: &Value) -> Vec<NeoSummary> {
    let Some(days) = payload.get("near_earth_objects").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut summaries = Vec::new();
    for (date, objects) in days {
        let Some(objects) = objects.as_array() else {
            continue;
        };
        for neo in objects {
            match NeoSummary::from_object(neo) {
                Some(summary) => summaries.push(summary),
                None => debug!(date = %date, "skipping malformed near-earth object"),
            }
        }
    }
    summaries
}

#[derive(Debug, Clone, PartialEq)]
pub struct NeoFeed {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub objects: Vec<NeoSummary>,
    pub source: FetchSource,
}

/// NASA NeoWs feed with last-known-good caching.
#[derive(Debug)]
pub struct NeoFeedClient {
    client: Client,
    ring: ProviderKeyRing,
    endpoint: String,
    store: CacheFallbackStore,
    ttl: Duration,
}

impl NeoFeedClient {
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        Self::with_store(config, config.cache_store()?)
    }

    pub fn with_store(config: &ProviderConfig, store: CacheFallbackStore) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(
                Duration::from_secs(config.timeouts.feed_secs),
                &default_user_agent(),
            )?,
            ring: config.nasa_ring(),
            endpoint: config.endpoints.neo_feed.clone(),
            store,
            ttl: config.feed_ttl(),
        })
    }

    pub fn store(&self) -> &CacheFallbackStore {
        &self.store
    }

    /// Objects approaching in `[start, start + 7 days]`.
    pub fn feed(&self, start: NaiveDate) -> ProviderResult<NeoFeed> {
        let end = start + chrono::Days::new(FEED_WINDOW_DAYS);
        let start_param = start.format("%Y-%m-%d").to_string();
        let end_param = end.format("%Y-%m-%d").to_string();

        let key = fingerprint(
            NAMESPACE,
            &[
                ("start_date", start_param.as_str()),
                ("end_date", end_param.as_str()),
            ],
        );

        let fetched = self
            .store
            .fetch_or_fallback(&key, self.ttl, || {
                fetch_with_fallback(
                    &self.ring,
                    |api_key| {
                        send_json(self.client.get(&self.endpoint).query(&[
                            ("start_date", start_param.as_str()),
                            ("end_date", end_param.as_str()),
                            ("api_key", api_key.as_str()),
                        ]))
                    },
                    default_classify,
                )
            })
            .map_err(|e| ProviderError::StaleCacheUnavailable {
                namespace: NAMESPACE.to_string(),
                cause: e.to_string(),
            })?;

        Ok(NeoFeed {
            start,
            end,
            objects: parse_feed(&fetched.payload),
            source: fetched.source,
        })
    }

    /// Feed starting today in local time.
    pub fn feed_today(&self) -> ProviderResult<NeoFeed> {
        self.feed(Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheEntry;
    use crate::config::Endpoints;
    use chrono::Utc;
    use mockito::Matcher;
    use serde_json::json;

    fn sample_feed() -> Value {
        json!({
            "element_count": 3,
            "near_earth_objects": {
                "2026-10-18": [
                    {
                        "id": "3542519",
                        "name": "(2010 PK9)",
                        "estimated_diameter": {"meters": {
                            "estimated_diameter_min": 118.2,
                            "estimated_diameter_max": 264.3
                        }},
                        "is_potentially_hazardous_asteroid": true,
                        "close_approach_data": [
                            {"relative_velocity": {"kilometers_per_second": "14.2837"}}
                        ]
                    },
                    {
                        "id": "3726710",
                        "name": "(2015 RC)",
                        "close_approach_data": []
                    }
                ],
                "2026-10-19": [
                    {
                        "id": "54016814",
                        "name": "(2020 HX6)",
                        "estimated_diameter": {"meters": {}},
                        "close_approach_data": [
                            {"relative_velocity": {"kilometers_per_second": "not-a-number"}}
                        ]
                    },
                    {
                        "id": "2000433",
                        "name": "433 Eros (A898 PA)",
                        "is_potentially_hazardous_asteroid": false
                    }
                ]
            }
        })
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn client_for(base: &str) -> NeoFeedClient {
        let config = ProviderConfig::builder()
            .with_nasa_api_key("nasa-test-key")
            .with_endpoints(Endpoints::rooted_at(base))
            .build()
            .unwrap();
        NeoFeedClient::with_store(&config, CacheFallbackStore::memory_only()).unwrap()
    }

    #[test]
    fn test_parse_feed() {
        let summaries = parse_feed(&sample_feed());
        assert_eq!(summaries.len(), 2);

        let pk9 = &summaries[0];
        assert_eq!(pk9.id, "3542519");
        assert_eq!(pk9.diameter_m, Some(191.25));
        assert_eq!(pk9.velocity_km_s, 14.28);
        assert!(pk9.is_hazardous);

        let eros = &summaries[1];
        assert_eq!(eros.name, "433 Eros (A898 PA)");
        assert_eq!(eros.diameter_m, None);
        assert_eq!(eros.velocity_km_s, 0.0);
        assert!(!eros.is_hazardous);
    }

    #[test]
    fn test_parse_feed_without_objects() {
        assert!(parse_feed(&json!({"error": "quota"})).is_empty());
    }

    #[test]
    fn test_live_feed_is_cached() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/neo/rest/v1/feed")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start_date".into(), "2026-10-18".into()),
                Matcher::UrlEncoded("end_date".into(), "2026-10-25".into()),
                Matcher::UrlEncoded("api_key".into(), "nasa-test-key".into()),
            ]))
            .with_status(200)
            .with_body(sample_feed().to_string())
            .expect(1)
            .create();

        let client = client_for(&server.url());
        let feed = client.feed(date(2026, 10, 18)).unwrap();
        assert_eq!(feed.source, FetchSource::Live);
        assert_eq!(feed.end, date(2026, 10, 25));
        assert_eq!(feed.objects.len(), 2);

        let key = "neo-feed?end_date=2026-10-25&start_date=2026-10-18";
        assert!(client.store().get_fresh(key).is_some());
        mock.assert();
    }

    #[test]
    fn test_outage_served_from_stale_cache() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/neo/rest/v1/feed")
            .match_query(Matcher::Any)
            .with_status(503)
            .create();

        let client = client_for(&server.url());
        let key = "neo-feed?end_date=2026-10-25&start_date=2026-10-18";
        client
            .store()
            .put_entry(
                CacheEntry::new(key, sample_feed(), Duration::from_secs(43_200))
                    .with_fetched_at(Utc::now() - chrono::Duration::days(3)),
            )
            .unwrap();

        let feed = client.feed(date(2026, 10, 18)).unwrap();
        assert_eq!(feed.source, FetchSource::CacheFallback);
        assert_eq!(feed.objects[0].name, "(2010 PK9)");
    }

    #[test]
    fn test_outage_without_cache() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/neo/rest/v1/feed")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .create();

        let client = client_for(&server.url());
        match client.feed(date(2026, 10, 18)).unwrap_err() {
            ProviderError::StaleCacheUnavailable { namespace, cause } => {
                assert_eq!(namespace, "neo-feed");
                assert!(cause.contains("500"));
                assert!(cause.contains("nothing is cached"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_outage_with_unreadable_cache() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/neo/rest/v1/feed")
            .match_query(Matcher::Any)
            .with_status(503)
            .create();

        // A directory where the entry file should be makes the read fail.
        let temp_dir = tempfile::TempDir::new().unwrap();
        let key = "neo-feed?end_date=2026-10-25&start_date=2026-10-18";
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(key.as_bytes());
        std::fs::create_dir(temp_dir.path().join(format!("{:08x}.json", hasher.finalize())))
            .unwrap();

        let config = ProviderConfig::builder()
            .with_nasa_api_key("nasa-test-key")
            .with_endpoints(Endpoints::rooted_at(&server.url()))
            .with_cache_dir(temp_dir.path())
            .build()
            .unwrap();
        let client = NeoFeedClient::new(&config).unwrap();

        match client.feed(date(2026, 10, 18)).unwrap_err() {
            ProviderError::StaleCacheUnavailable { cause, .. } => {
                assert!(cause.contains("503"));
                assert!(cause.contains("cache is unavailable"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
