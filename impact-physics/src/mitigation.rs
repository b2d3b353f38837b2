//! Back-of-envelope deflection estimates.
//!
//! These are teaching aids, not mission design tools. Each estimator rejects
//! non-positive or non-finite inputs with
//! [`EngineError::InvalidParameter`](impact_core::EngineError::InvalidParameter).

use impact_core::constants::{
    GRAVITATIONAL_CONSTANT, METERS_PER_KILOMETER, SECONDS_PER_DAY, SECONDS_PER_YEAR,
};
use impact_core::{EngineError, EngineResult};

fn require_positive(parameter: &str, value: f64) -> EngineResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::invalid_parameter(
            parameter,
            &format!("must be a positive number, got {}", value),
        ))
    }
}

/// Along-track displacement in km after applying `delta_v_m_s` with
/// `lead_time_days` of warning.
pub fn kinetic_impactor(delta_v_m_s: f64, lead_time_days: f64) -> EngineResult<f64> {
    let dv = require_positive("delta_v_m_s", delta_v_m_s)?;
    let days = require_positive("lead_time_days", lead_time_days)?;
    Ok(dv * days * SECONDS_PER_DAY / METERS_PER_KILOMETER)
}

/// Velocity change in m/s imparted by a hovering spacecraft.
///
/// The asteroid mass cancels out of `F/m`, but it is still validated.
pub fn gravity_tractor(
    asteroid_mass_kg: f64,
    spacecraft_mass_kg: f64,
    hover_distance_m: f64,
    years: f64,
) -> EngineResult<f64> {
    require_positive("asteroid_mass_kg", asteroid_mass_kg)?;
    let spacecraft = require_positive("spacecraft_mass_kg", spacecraft_mass_kg)?;
    let distance = require_positive("hover_distance_m", hover_distance_m)?;
    let years = require_positive("years", years)?;

    let acceleration = GRAVITATIONAL_CONSTANT * spacecraft / (distance * distance);
    Ok(acceleration * years * SECONDS_PER_YEAR)
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NuclearEstimate {
    /// `min(yield / 1000 Mt, 1)`.
    pub fragmentation_probability: f64,
    pub estimated_fragments: u64,
}

pub fn nuclear_disruption(yield_mt: f64) -> EngineResult<NuclearEstimate> {
    let yield_mt = require_positive("yield_mt", yield_mt)?;
    let probability = (yield_mt / 1000.0).min(1.0);
    Ok(NuclearEstimate {
        fragmentation_probability: probability,
        estimated_fragments: (probability * yield_mt) as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kinetic_impactor() {
        // 1 cm/s for ten years' worth of days.
        let km = kinetic_impactor(0.01, 3650.0).unwrap();
        assert_relative_eq!(km, 3153.6, max_relative = 1e-12);
    }

    #[test]
    fn test_gravity_tractor() {
        let dv = gravity_tractor(5.0e10, 20_000.0, 200.0, 10.0).unwrap();
        let expected = 6.67430e-11 * 20_000.0 / 40_000.0 * 10.0 * 31_536_000.0;
        assert_relative_eq!(dv, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_nuclear_small_and_large_yield() {
        let small = nuclear_disruption(10.0).unwrap();
        assert_relative_eq!(small.fragmentation_probability, 0.01);
        assert_eq!(small.estimated_fragments, 0);

        let large = nuclear_disruption(2500.0).unwrap();
        assert_eq!(large.fragmentation_probability, 1.0);
        assert_eq!(large.estimated_fragments, 2500);
    }

    #[test]
    fn test_non_positive_inputs_rejected() {
        assert!(kinetic_impactor(0.0, 10.0).is_err());
        assert!(kinetic_impactor(1.0, -1.0).is_err());
        assert!(gravity_tractor(-1.0, 1.0, 1.0, 1.0).is_err());
        assert!(gravity_tractor(1.0, 1.0, f64::NAN, 1.0).is_err());
        let err = nuclear_disruption(0.0).unwrap_err();
        assert!(err.to_string().contains("yield_mt"));
    }
}
