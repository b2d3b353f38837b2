use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::errors::ProviderResult;
use crate::fetcher::{default_classify, fetch_with_tiers};
use crate::http::{build_client, send_json};

/// Nominatim reverse geocoding at city level (`zoom=10`).
///
/// Nominatim's usage policy requires an identifying user agent, taken from
/// `nominatim_user_agent`.
#[derive(Debug)]
pub struct GeocodeClient {
    client: Client,
    endpoint: String,
}

impl GeocodeClient {
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(
                Duration::from_secs(config.timeouts.geocode_secs),
                &config.nominatim_user_agent,
            )?,
            endpoint: config.endpoints.nominatim.clone(),
        })
    }

    pub fn reverse(&self, lat: f64, lon: f64) -> ProviderResult<Value> {
        fetch_with_tiers(
            "geocode",
            &["nominatim"],
            |_| {
                send_json(self.client.get(&self.endpoint).query(&[
                    ("format", "jsonv2".to_string()),
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("zoom", "10".to_string()),
                    ("addressdetails", "1".to_string()),
                ]))
            },
            default_classify,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use crate::errors::ProviderError;
    use mockito::Matcher;

    fn client_for(base: &str) -> GeocodeClient {
        let config = ProviderConfig::builder()
            .with_nominatim_user_agent("impact-tests/0.1 (ops@example.org)")
            .with_endpoints(Endpoints::rooted_at(base))
            .build()
            .unwrap();
        GeocodeClient::new(&config).unwrap()
    }

    #[test]
    fn test_reverse_sends_user_agent_and_params() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/reverse")
            .match_header("user-agent", "impact-tests/0.1 (ops@example.org)")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("format".into(), "jsonv2".into()),
                Matcher::UrlEncoded("zoom".into(), "10".into()),
                Matcher::UrlEncoded("addressdetails".into(), "1".into()),
                Matcher::UrlEncoded("lat".into(), "48.8566".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"display_name": "Paris, France", "address": {"city": "Paris"}}"#)
            .create();

        let place = client_for(&server.url()).reverse(48.8566, 2.3522).unwrap();
        assert_eq!(place["address"]["city"], "Paris");
        mock.assert();
    }

    #[test]
    fn test_reverse_failure() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/reverse")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("Access blocked")
            .create();

        let err = client_for(&server.url()).reverse(0.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::AllProvidersExhausted { attempts: 1, last_status: Some(403), .. }
        ));
    }
}
