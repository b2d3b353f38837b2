use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};

use crate::config::ProviderConfig;
use crate::errors::{AttemptError, ProviderResult};
use crate::fetcher::{fetch_with_fallback, rotate_on_any};
use crate::http::{build_client, default_user_agent, send_json};
use crate::keyring::ProviderKeyRing;

/// Gemini `generateContent` over REST.
///
/// Any failure moves on to the next key: quota, auth and model errors all
/// look alike from here.
#[derive(Debug)]
pub struct GenerativeClient {
    client: Client,
    ring: ProviderKeyRing,
    endpoint: String,
    model: String,
}

/// Concatenated text parts of the first candidate. Empty when the model
/// returned no candidate.
fn candidate_text(payload: &Value) -> Result<String, AttemptError> {
    let Some(candidates) = payload.get("candidates") else {
        if payload.get("promptFeedback").is_some() {
            return Ok(String::new());
        }
        return Err(AttemptError::payload("response has neither candidates nor promptFeedback"));
    };

    let parts = candidates
        .get(0)
        .and_then(|c| c.pointer("/content/parts"))
        .and_then(Value::as_array);

    Ok(parts
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default())
}

impl GenerativeClient {
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(
                Duration::from_secs(config.timeouts.generative_secs),
                &default_user_agent(),
            )?,
            ring: config.generative_ring(),
            endpoint: config.endpoints.generative.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn generate(&self, prompt: &str) -> ProviderResult<String> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}]
        });

        fetch_with_fallback(
            &self.ring,
            |key| {
                let payload = send_json(
                    self.client
                        .post(&url)
                        .header("x-goog-api-key", key.as_str())
                        .json(&body),
                )?;
                candidate_text(&payload)
            },
            rotate_on_any,
        )
    }
}
