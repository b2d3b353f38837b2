use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced to callers of the provider layer.
///
/// Individual attempt failures ([`AttemptError`]) never escape on their own;
/// they are folded into [`ProviderError::AllProvidersExhausted`] once every
/// key or tier has been tried.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(
        "All {provider} providers exhausted after {attempts} attempt(s) (last status: {}): {}",
        describe_status(.last_status),
        describe_last_error(.last_error)
    )]
    AllProvidersExhausted {
        provider: String,
        attempts: usize,
        last_status: Option<u16>,
        last_error: Option<String>,
    },

    /// Live fetch failed and no cached copy could be served.
    #[error("{namespace} unavailable: {cause}")]
    StaleCacheUnavailable { namespace: String, cause: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Unexpected payload from {provider}: {message}")]
    Payload { provider: String, message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("HTTP client error: {message}")]
    Client { message: String },
}

fn describe_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |code| code.to_string())
}

fn describe_last_error(error: &Option<String>) -> &str {
    error.as_deref().unwrap_or("no usable credentials")
}

fn timeout_suffix(timeout: &bool) -> &'static str {
    if *timeout {
        " (timeout)"
    } else {
        ""
    }
}

impl ProviderError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn payload(provider: &str, message: impl Into<String>) -> Self {
        Self::Payload {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn cache(operation: &str, error: &str) -> Self {
        Self::Cache {
            message: format!("{}: {}", operation, error),
        }
    }

    pub fn client(operation: &str, error: &str) -> Self {
        Self::Client {
            message: format!("{}: {}", operation, error),
        }
    }

    /// Exhaustion is transient: keys recover from rate limits and outages
    /// end. Everything else needs a code or configuration change.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::AllProvidersExhausted { .. })
    }

    /// HTTP status of the last failed attempt, when the error carries one.
    pub fn last_status(&self) -> Option<u16> {
        match self {
            Self::AllProvidersExhausted { last_status, .. } => *last_status,
            _ => None,
        }
    }
}

/// Why one attempt against one key or tier failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("network error{}: {message}", timeout_suffix(.timeout))]
    Network { message: String, timeout: bool },

    #[error("invalid payload: {message}")]
    Payload { message: String },
}

impl AttemptError {
    /// Response bodies are truncated to this many characters.
    pub const BODY_LIMIT: usize = 400;

    pub fn status(code: u16, body: &str) -> Self {
        Self::Status {
            code,
            body: body.chars().take(Self::BODY_LIMIT).collect(),
        }
    }

    pub fn network(message: impl Into<String>, timeout: bool) -> Self {
        Self::Network {
            message: message.into(),
            timeout,
        }
    }

    pub fn payload(message: impl Into<String>) -> Self {
        Self::Payload {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AttemptError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return Self::status(status.as_u16(), &error.to_string());
        }
        if error.is_decode() {
            return Self::payload(error.to_string());
        }
        Self::network(error.to_string(), error.is_timeout())
    }
}

impl From<serde_json::Error> for AttemptError {
    fn from(error: serde_json::Error) -> Self {
        Self::payload(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaustion_message() {
        let err = ProviderError::AllProvidersExhausted {
            provider: "weather".to_string(),
            attempts: 3,
            last_status: Some(429),
            last_error: Some("HTTP 429: slow down".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("weather"));
        assert!(msg.contains("3 attempt"));
        assert!(msg.contains("429"));
        assert!(err.is_recoverable());
        assert_eq!(err.last_status(), Some(429));
    }

    #[test]
    fn test_exhaustion_without_attempts() {
        let err = ProviderError::AllProvidersExhausted {
            provider: "generative".to_string(),
            attempts: 0,
            last_status: None,
            last_error: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("last status: none"));
        assert!(msg.contains("no usable credentials"));
    }

    #[test]
    fn test_other_errors_not_recoverable() {
        assert!(!ProviderError::configuration("bad").is_recoverable());
        assert!(!ProviderError::cache("write", "disk full").is_recoverable());
        assert!(!ProviderError::payload("neo", "missing field").is_recoverable());
        assert_eq!(ProviderError::client("build", "tls").last_status(), None);
    }

    #[test]
    fn test_attempt_status_body_truncated() {
        let body = "x".repeat(1000);
        let err = AttemptError::status(500, &body);
        match &err {
            AttemptError::Status { body, .. } => assert_eq!(body.len(), AttemptError::BODY_LIMIT),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(AttemptError::payload("x").status_code(), None);
    }

    #[test]
    fn test_network_display_marks_timeout() {
        assert!(AttemptError::network("read", true).to_string().contains("timeout"));
        assert!(!AttemptError::network("refused", false).to_string().contains("timeout"));
    }
}
