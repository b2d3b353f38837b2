//! Error types for the impact physics engine.
//!
//! [`EngineError`] covers the failure modes of the numeric code: degenerate
//! orbital inputs and out-of-range parameters.
//!
//! # Error Categories
//!
//! | Variant | Use Case | Recoverable? |
//! |---------|----------|--------------|
//! | [`NumericDomain`](EngineError::NumericDomain) | Zero divisor, non-finite, open conic | No |
//! | [`InvalidParameter`](EngineError::InvalidParameter) | Caller value outside its range | No |
//!
//! None of these are retried. They describe a malformed request and must be
//! reported to the caller rather than replaced with a default value.
//!
//! ```
//! use impact_core::{EngineError, MathErrorKind};
//!
//! fn semi_latus_rectum(a: f64, e: f64) -> Result<f64, EngineError> {
//!     let p = a * (1.0 - e * e);
//!     if p <= 0.0 {
//!         return Err(EngineError::numeric_domain(
//!             "semi_latus_rectum",
//!             MathErrorKind::DivisionByZero,
//!             "a(1 - e^2) must be positive",
//!         ));
//!     }
//!     Ok(p)
//! }
//! ```

use thiserror::Error;

/// Classification of numerical failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathErrorKind {
    /// Attempted division by zero or near-zero value.
    DivisionByZero,
    /// Result is NaN or infinity.
    NotFinite,
    /// Value outside valid domain (e.g., eccentricity >= 1 for an ellipse).
    OutOfRange,
}

/// Unified error type for the physics crates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Numerical domain failure (degenerate orbit, non-finite intermediate).
    #[error("Numeric domain error in {operation} ({kind:?}): {message}")]
    NumericDomain {
        operation: String,
        kind: MathErrorKind,
        message: String,
    },

    /// A caller-supplied parameter is outside its valid range.
    #[error("Invalid parameter {parameter}: {message}")]
    InvalidParameter { parameter: String, message: String },
}

/// Convenience alias for `Result<T, EngineError>`.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Creates a [`NumericDomain`](Self::NumericDomain) error with the given kind.
    pub fn numeric_domain(operation: &str, kind: MathErrorKind, reason: &str) -> Self {
        Self::NumericDomain {
            operation: operation.to_string(),
            kind,
            message: reason.to_string(),
        }
    }

    /// Creates an [`InvalidParameter`](Self::InvalidParameter) error.
    pub fn invalid_parameter(parameter: &str, reason: &str) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            message: reason.to_string(),
        }
    }

    /// Returns the [`MathErrorKind`] for numeric domain errors.
    pub fn math_kind(&self) -> Option<MathErrorKind> {
        match self {
            Self::NumericDomain { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns `true` when the error came from a degenerate numeric domain.
    pub fn is_numeric_domain(&self) -> bool {
        matches!(self, Self::NumericDomain { .. })
    }
}

/// Rejects NaN and infinities with a [`NumericDomain`](EngineError::NumericDomain) error.
pub fn ensure_finite(operation: &str, name: &str, value: f64) -> EngineResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::numeric_domain(
            operation,
            MathErrorKind::NotFinite,
            &format!("{} is not finite ({})", name, value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_domain_error() {
        let err = EngineError::numeric_domain(
            "resolve_velocity",
            MathErrorKind::DivisionByZero,
            "a(1 - e^2) is zero",
        );
        assert!(err.to_string().contains("Numeric domain error"));
        assert!(err.to_string().contains("DivisionByZero"));
        assert!(err.to_string().contains("resolve_velocity"));
        assert_eq!(err.math_kind(), Some(MathErrorKind::DivisionByZero));
        assert!(err.is_numeric_domain());
    }

    #[test]
    fn test_invalid_parameter_error() {
        let err = EngineError::invalid_parameter("lead_time_days", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid parameter lead_time_days: must be positive"
        );
        assert_eq!(err.math_kind(), None);
        assert!(!err.is_numeric_domain());
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("op", "x", 1.5).unwrap(), 1.5);

        let err = ensure_finite("op", "x", f64::NAN).unwrap_err();
        assert_eq!(err.math_kind(), Some(MathErrorKind::NotFinite));

        let err = ensure_finite("op", "x", f64::INFINITY).unwrap_err();
        assert!(err.to_string().contains("x is not finite"));
    }

    #[test]
    fn test_send_sync() {
        fn _assert_send<T: Send>() {}
        fn _assert_sync<T: Sync>() {}
        _assert_send::<EngineError>();
        _assert_sync::<EngineError>();
    }
}
