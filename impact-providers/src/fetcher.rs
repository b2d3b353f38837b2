//! Try each credential (or provider tier) in order until one succeeds.
//!
//! Every failure class advances to the next candidate. The class only
//! decides how loudly the failure is logged:
//!
//! | Class | Typical cause | Log level |
//! |-------|---------------|-----------|
//! | [`FailureClass::Rotate`] | 401, 403, 429 | `warn` |
//! | [`FailureClass::Abort`] | other HTTP status, bad payload | `error` |
//! | [`FailureClass::NetworkRetry`] | connect/read failure, timeout | `error` |
//!
//! When nothing is left the caller gets
//! [`ProviderError::AllProvidersExhausted`] with the number of attempts, the
//! most recent HTTP status observed and the final attempt's error.

use std::fmt;

use tracing::{error, info, warn};

use crate::errors::{AttemptError, ProviderError, ProviderResult};
use crate::keyring::{ProviderKey, ProviderKeyRing};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The credential is unusable for now; the next one may work.
    Rotate,
    /// The request itself failed for a reason unrelated to the credential.
    Abort,
    /// Transport failure.
    NetworkRetry,
}

/// 401/403/429 rotate, other statuses and payload errors abort, transport
/// errors retry.
pub fn default_classify(err: &AttemptError) -> FailureClass {
    match err {
        AttemptError::Status { code, .. } if matches!(code, 401 | 403 | 429) => {
            FailureClass::Rotate
        }
        AttemptError::Status { .. } | AttemptError::Payload { .. } => FailureClass::Abort,
        AttemptError::Network { .. } => FailureClass::NetworkRetry,
    }
}

/// Every failure rotates. Used for providers whose errors carry no useful
/// distinction, such as the generative endpoint.
pub fn rotate_on_any(_err: &AttemptError) -> FailureClass {
    FailureClass::Rotate
}

struct AttemptLog<'a> {
    provider: &'a str,
    attempts: usize,
    last_status: Option<u16>,
    last_error: Option<String>,
}

impl<'a> AttemptLog<'a> {
    fn new(provider: &'a str) -> Self {
        Self {
            provider,
            attempts: 0,
            last_status: None,
            last_error: None,
        }
    }

    fn record_failure(
        &mut self,
        candidate: &dyn fmt::Display,
        err: &AttemptError,
        class: FailureClass,
    ) {
        if let Some(code) = err.status_code() {
            self.last_status = Some(code);
        }
        self.last_error = Some(err.to_string());

        match class {
            FailureClass::Rotate => warn!(
                provider = self.provider,
                candidate = %candidate,
                error = %err,
                "credential rejected, rotating"
            ),
            FailureClass::Abort => error!(
                provider = self.provider,
                candidate = %candidate,
                error = %err,
                "request failed, trying next candidate"
            ),
            FailureClass::NetworkRetry => error!(
                provider = self.provider,
                candidate = %candidate,
                error = %err,
                "network failure, trying next candidate"
            ),
        }
    }

    fn exhausted(self) -> ProviderError {
        ProviderError::AllProvidersExhausted {
            provider: self.provider.to_string(),
            attempts: self.attempts,
            last_status: self.last_status,
            last_error: self.last_error,
        }
    }
}

struct KeyLabel(usize);

impl fmt::Display for KeyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key #{}", self.0)
    }
}

/// Calls `attempt` with each usable key of `ring` until one succeeds.
///
/// Placeholder keys are skipped without calling `attempt`, so a ring of
/// placeholders exhausts with zero attempts and no network traffic. The
/// successful payload is returned unchanged.
pub fn fetch_with_fallback<T, A, C>(
    ring: &ProviderKeyRing,
    mut attempt: A,
    classify: C,
) -> ProviderResult<T>
where
    A: FnMut(&ProviderKey) -> Result<T, AttemptError>,
    C: Fn(&AttemptError) -> FailureClass,
{
    let mut log = AttemptLog::new(ring.provider());
    let mut cursor = ring.cursor();

    while let Some((index, key)) = cursor.next_usable() {
        log.attempts += 1;
        match attempt(key) {
            Ok(payload) => {
                info!(provider = ring.provider(), key_index = index, "provider call succeeded");
                return Ok(payload);
            }
            Err(err) => {
                let class = classify(&err);
                log.record_failure(&KeyLabel(index), &err, class);
            }
        }
    }

    Err(log.exhausted())
}

/// Same policy over an ordered list of heterogeneous provider tiers instead
/// of a key ring.
pub fn fetch_with_tiers<Tier, T, A, C>(
    provider: &str,
    tiers: &[Tier],
    mut attempt: A,
    classify: C,
) -> ProviderResult<T>
where
    Tier: fmt::Display,
    A: FnMut(&Tier) -> Result<T, AttemptError>,
    C: Fn(&AttemptError) -> FailureClass,
{
    let mut log = AttemptLog::new(provider);

    for tier in tiers {
        log.attempts += 1;
        match attempt(tier) {
            Ok(payload) => {
                info!(provider, tier = %tier, "provider call succeeded");
                return Ok(payload);
            }
            Err(err) => {
                let class = classify(&err);
                log.record_failure(tier, &err, class);
            }
        }
    }

    Err(log.exhausted())
}
