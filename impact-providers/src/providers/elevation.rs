use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::warn;

use super::number_field;
use crate::config::ProviderConfig;
use crate::errors::{AttemptError, ProviderResult};
use crate::fetcher::{default_classify, fetch_with_tiers};
use crate::http::{build_client, default_user_agent, send_json};
use crate::keyring::ProviderKey;

/// Elevation sources in the order they are tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElevationTier {
    /// USGS Elevation Point Query Service. Keyless, US coverage.
    Usgs,
    /// Google Maps Elevation API. Global, needs a key.
    Google(ProviderKey),
}

impl fmt::Display for ElevationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElevationTier::Usgs => f.write_str("usgs-epqs"),
            ElevationTier::Google(_) => f.write_str("google-elevation"),
        }
    }
}

/// Ground elevation in metres, USGS first with Google as the fallback.
#[derive(Debug)]
pub struct ElevationClient {
    client: Client,
    tiers: Vec<ElevationTier>,
    usgs_endpoint: String,
    google_endpoint: String,
}

impl ElevationClient {
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        let mut tiers = vec![ElevationTier::Usgs];
        match config.google_maps_key.as_deref().map(ProviderKey::new) {
            Some(key) if !key.is_placeholder() => tiers.push(ElevationTier::Google(key)),
            _ => {}
        }

        Ok(Self {
            client: build_client(
                Duration::from_secs(config.timeouts.elevation_secs),
                &default_user_agent(),
            )?,
            tiers,
            usgs_endpoint: config.endpoints.usgs_elevation.clone(),
            google_endpoint: config.endpoints.google_elevation.clone(),
        })
    }

    pub fn tiers(&self) -> &[ElevationTier] {
        &self.tiers
    }

    pub fn elevation(&self, lat: f64, lon: f64) -> ProviderResult<f64> {
        fetch_with_tiers(
            "elevation",
            &self.tiers,
            |tier| match tier {
                ElevationTier::Usgs => self.query_usgs(lat, lon),
                ElevationTier::Google(key) => self.query_google(key, lat, lon),
            },
            default_classify,
        )
    }

    /// Sea level (0 m) when every tier fails.
    pub fn elevation_or_sea_level(&self, lat: f64, lon: f64) -> f64 {
        self.elevation(lat, lon).unwrap_or_else(|e| {
            warn!(lat, lon, error = %e, "elevation unavailable, assuming sea level");
            0.0
        })
    }

    fn query_usgs(&self, lat: f64, lon: f64) -> Result<f64, AttemptError> {
        let payload = send_json(self.client.get(&self.usgs_endpoint).query(&[
            ("x", lon.to_string()),
            ("y", lat.to_string()),
            ("units", "Meters".to_string()),
            ("output", "json".to_string()),
        ]))?;

        payload
            .get("value")
            .and_then(number_field)
            .ok_or_else(|| AttemptError::payload("USGS response has no numeric value"))
    }

    fn query_google(&self, key: &ProviderKey, lat: f64, lon: f64) -> Result<f64, AttemptError> {
        let payload = send_json(self.client.get(&self.google_endpoint).query(&[
            ("locations", format!("{},{}", lat, lon)),
            ("key", key.as_str().to_string()),
        ]))?;

        let status = payload.get("status").and_then(Value::as_str).unwrap_or("");
        if status != "OK" {
            return Err(AttemptError::payload(format!(
                "Google elevation status {:?}",
                status
            )));
        }

        payload
            .pointer("/results/0/elevation")
            .and_then(number_field)
            .ok_or_else(|| AttemptError::payload("Google response has no results"))
    }
}
