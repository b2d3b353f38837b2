use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};

use crate::errors::{AttemptError, ProviderError, ProviderResult};

pub fn default_user_agent() -> String {
    format!("impact-providers/{}", env!("CARGO_PKG_VERSION"))
}

/// Blocking client with a per-request timeout. Every attempt against a key
/// or tier is bounded by it.
pub fn build_client(timeout: Duration, user_agent: &str) -> ProviderResult<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::client("Failed to create HTTP client", &e.to_string()))
}

/// Sends the request and decodes a JSON body. Non-2xx responses become
/// [`AttemptError::Status`] with the (truncated) body.
pub fn send_json(request: RequestBuilder) -> Result<serde_json::Value, AttemptError> {
    let response = request.send()?;
    let status = response.status();
    let body = response.text()?;

    if !status.is_success() {
        return Err(AttemptError::status(status.as_u16(), &body));
    }

    Ok(serde_json::from_str(&body)?)
}
