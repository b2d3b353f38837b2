use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::number_field;
use crate::config::ProviderConfig;
use crate::errors::ProviderResult;
use crate::fetcher::{default_classify, fetch_with_fallback};
use crate::http::{build_client, default_user_agent, send_json};
use crate::keyring::ProviderKeyRing;

/// Current conditions in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub name: String,
    pub description: String,
    pub temp_c: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

impl WeatherSummary {
    pub fn from_payload(payload: &Value) -> Self {
        let description = match payload.get("weather").and_then(Value::as_array) {
            Some(list) if !list.is_empty() => capitalize(
                list[0]
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown"),
            ),
            _ => "Unknown".to_string(),
        };

        Self {
            name: payload
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Unknown Location")
                .to_string(),
            description,
            temp_c: payload.pointer("/main/temp").and_then(number_field),
            humidity: payload.pointer("/main/humidity").and_then(number_field),
            wind_speed: payload.pointer("/wind/speed").and_then(number_field),
        }
    }
}

/// OpenWeatherMap current weather with key rotation.
#[derive(Debug)]
pub struct WeatherClient {
    client: Client,
    ring: ProviderKeyRing,
    endpoint: String,
}

impl WeatherClient {
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(
                Duration::from_secs(config.timeouts.weather_secs),
                &default_user_agent(),
            )?,
            ring: config.weather_ring(),
            endpoint: config.endpoints.weather.clone(),
        })
    }

    /// Raw response of the first key that works.
    pub fn current_raw(&self, lat: f64, lon: f64) -> ProviderResult<Value> {
        let lat = lat.to_string();
        let lon = lon.to_string();
        fetch_with_fallback(
            &self.ring,
            |key| {
                send_json(self.client.get(&self.endpoint).query(&[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("units", "metric"),
                    ("appid", key.as_str()),
                ]))
            },
            default_classify,
        )
    }

    pub fn current(&self, lat: f64, lon: f64) -> ProviderResult<WeatherSummary> {
        self.current_raw(lat, lon).map(|payload| WeatherSummary::from_payload(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use crate::errors::ProviderError;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(base: &str, keys: &[&str]) -> ProviderConfig {
        ProviderConfig::builder()
            .with_weather_keys(keys.iter().copied())
            .with_endpoints(Endpoints::rooted_at(base))
            .build()
            .unwrap()
    }

    #[test]
    fn test_summary_from_payload() {
        let payload = json!({
            "name": "Honolulu",
            "weather": [{"description": "scattered CLOUDS"}],
            "main": {"temp": 27.4, "humidity": 70},
            "wind": {"speed": 5.1}
        });
        let summary = WeatherSummary::from_payload(&payload);
        assert_eq!(summary.name, "Honolulu");
        assert_eq!(summary.description, "Scattered clouds");
        assert_eq!(summary.temp_c, Some(27.4));
        assert_eq!(summary.humidity, Some(70.0));
        assert_eq!(summary.wind_speed, Some(5.1));
    }

    #[test]
    fn test_summary_defaults() {
        let summary = WeatherSummary::from_payload(&json!({}));
        assert_eq!(summary.name, "Unknown Location");
        assert_eq!(summary.description, "Unknown");
        assert_eq!(summary.temp_c, None);

        let no_description = WeatherSummary::from_payload(&json!({"weather": [{}]}));
        assert_eq!(no_description.description, "Unknown");
    }

    #[tokio::test]
    async fn test_rotates_past_rejected_keys() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("appid", "revoked"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("appid", "limited"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("appid", "good"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Reykjavik",
                "weather": [{"description": "light rain"}],
                "main": {"temp": 4.0, "humidity": 93},
                "wind": {"speed": 11.2}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = config_for(
            &mock_server.uri(),
            &["revoked", "PLACEHOLDER_OPENWEATHER_KEY_2", "limited", "good"],
        );

        let result = tokio::task::spawn_blocking(move || {
            WeatherClient::new(&config).unwrap().current(64.1, -21.9)
        })
        .await
        .unwrap();

        let summary = result.unwrap();
        assert_eq!(summary.name, "Reykjavik");
        assert_eq!(summary.description, "Light rain");
    }

    #[tokio::test]
    async fn test_server_error_continues_to_next_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("appid", "first"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream broke"))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(query_param("appid", "second"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Lima"})))
            .mount(&mock_server)
            .await;

        let config = config_for(&mock_server.uri(), &["first", "second"]);
        let result = tokio::task::spawn_blocking(move || {
            WeatherClient::new(&config).unwrap().current(-12.0, -77.0)
        })
        .await
        .unwrap();

        assert_eq!(result.unwrap().name, "Lima");
    }

    #[tokio::test]
    async fn test_all_keys_fail() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .expect(2)
            .mount(&mock_server)
            .await;

        let config = config_for(&mock_server.uri(), &["a", "b"]);
        let result = tokio::task::spawn_blocking(move || {
            WeatherClient::new(&config).unwrap().current(0.0, 0.0)
        })
        .await
        .unwrap();

        match result.unwrap_err() {
            ProviderError::AllProvidersExhausted {
                provider,
                attempts,
                last_status,
                last_error,
            } => {
                assert_eq!(provider, "weather");
                assert_eq!(attempts, 2);
                assert_eq!(last_status, Some(429));
                assert!(last_error.unwrap().contains("quota exceeded"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_placeholder_ring_makes_no_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let config = config_for(&mock_server.uri(), &["PLACEHOLDER_1", ""]);
        let result = tokio::task::spawn_blocking(move || {
            WeatherClient::new(&config).unwrap().current(0.0, 0.0)
        })
        .await
        .unwrap();

        let err = result.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::AllProvidersExhausted { attempts: 0, .. }
        ));
    }
}
