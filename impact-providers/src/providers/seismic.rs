use std::time::Duration;

use chrono::{Local, NaiveDate};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::errors::ProviderResult;
use crate::fetcher::{default_classify, fetch_with_tiers};
use crate::http::{build_client, default_user_agent, send_json};

/// Historical earthquakes around a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
    pub min_magnitude: f64,
    pub start: NaiveDate,
    /// Defaults to today when unset.
    pub end: Option<NaiveDate>,
}

impl SeismicQuery {
    /// Magnitude 4.5 and above within 300 km since 1970.
    pub fn around(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            radius_km: 300.0,
            min_magnitude: 4.5,
            start: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default(),
            end: None,
        }
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn with_min_magnitude(mut self, magnitude: f64) -> Self {
        self.min_magnitude = magnitude;
        self
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = start;
        self.end = Some(end);
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let end = self.end.unwrap_or_else(|| Local::now().date_naive());
        vec![
            ("format", "geojson".to_string()),
            ("starttime", self.start.format("%Y-%m-%d").to_string()),
            ("endtime", end.format("%Y-%m-%d").to_string()),
            ("latitude", self.lat.to_string()),
            ("longitude", self.lon.to_string()),
            ("maxradiuskm", self.radius_km.to_string()),
            ("minmagnitude", self.min_magnitude.to_string()),
        ]
    }
}

/// USGS FDSN event service.
#[derive(Debug)]
pub struct SeismicClient {
    client: Client,
    endpoint: String,
}

impl SeismicClient {
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(
                Duration::from_secs(config.timeouts.seismic_secs),
                &default_user_agent(),
            )?,
            endpoint: config.endpoints.seismic.clone(),
        })
    }

    /// GeoJSON `FeatureCollection` of matching events.
    pub fn history(&self, query: &SeismicQuery) -> ProviderResult<Value> {
        let params = query.params();
        fetch_with_tiers(
            "seismic",
            &["usgs-fdsn"],
            |_| send_json(self.client.get(&self.endpoint).query(&params)),
            default_classify,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use mockito::Matcher;

    #[test]
    fn test_default_query() {
        let query = SeismicQuery::around(35.0, 139.0);
        assert_eq!(query.radius_km, 300.0);
        assert_eq!(query.min_magnitude, 4.5);
        assert_eq!(query.start, NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());

        let params = query.params();
        assert!(params.contains(&("format", "geojson".to_string())));
        assert!(params.contains(&("maxradiuskm", "300".to_string())));
        assert!(params.iter().any(|(name, _)| *name == "endtime"));
    }

    #[test]
    fn test_history_request() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/fdsnws/event/1/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("format".into(), "geojson".into()),
                Matcher::UrlEncoded("starttime".into(), "2000-01-01".into()),
                Matcher::UrlEncoded("endtime".into(), "2010-12-31".into()),
                Matcher::UrlEncoded("maxradiuskm".into(), "150".into()),
                Matcher::UrlEncoded("minmagnitude".into(), "6".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"type": "FeatureCollection", "features": [{"id": "usp000hvnu"}]}"#)
            .create();

        let config = ProviderConfig::builder()
            .with_endpoints(Endpoints::rooted_at(&server.url()))
            .build()
            .unwrap();
        let query = SeismicQuery::around(38.3, 142.4)
            .with_radius_km(150.0)
            .with_min_magnitude(6.0)
            .between(
                NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2010, 12, 31).unwrap(),
            );

        let events = SeismicClient::new(&config).unwrap().history(&query).unwrap();
        assert_eq!(events["features"].as_array().unwrap().len(), 1);
        mock.assert();
    }
}
