use impact_core::constants::{DEG_TO_RAD, METERS_PER_KILOMETER, MU_EARTH_M3_S2};
use impact_core::errors::ensure_finite;
use impact_core::{EngineError, EngineResult, MathErrorKind, RotationMatrix3, Vector3};

use super::OrbitalElements;

/// Position and velocity in the reference frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateVector {
    pub position_m: Vector3,
    pub velocity_m_s: Vector3,
}

impl StateVector {
    pub fn radius_m(&self) -> f64 {
        self.position_m.magnitude()
    }

    pub fn speed_km_s(&self) -> f64 {
        self.velocity_m_s.magnitude() / METERS_PER_KILOMETER
    }
}

/// Two-body resolver for a central body with gravitational parameter `mu`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalStateResolver {
    mu: f64,
}

impl Default for OrbitalStateResolver {
    fn default() -> Self {
        Self::earth()
    }
}

impl OrbitalStateResolver {
    /// Resolver around Earth, μ = 3.986004418×10¹⁴ m³/s².
    pub fn earth() -> Self {
        Self { mu: MU_EARTH_M3_S2 }
    }

    pub fn with_mu(mu: f64) -> EngineResult<Self> {
        if !mu.is_finite() || mu <= 0.0 {
            return Err(EngineError::invalid_parameter(
                "mu",
                &format!("gravitational parameter must be positive and finite, got {}", mu),
            ));
        }
        Ok(Self { mu })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn resolve_state(&self, elements: &OrbitalElements) -> EngineResult<StateVector> {
        elements.validate()?;

        let p = elements.semi_latus_rectum_m();
        if !p.is_finite() || p <= 0.0 {
            return Err(EngineError::numeric_domain(
                "resolve_state",
                MathErrorKind::DivisionByZero,
                &format!("semi-latus rectum a(1 - e²) is not positive ({} m)", p),
            ));
        }

        let e = elements.eccentricity;
        let nu = elements.true_anomaly_deg * DEG_TO_RAD;
        let (sin_nu, cos_nu) = nu.sin_cos();

        let denominator = 1.0 + e * cos_nu;
        if denominator <= 0.0 {
            return Err(EngineError::numeric_domain(
                "resolve_state",
                MathErrorKind::DivisionByZero,
                &format!("1 + e·cos(ν) is not positive ({})", denominator),
            ));
        }
        let r = p / denominator;

        let h_over_p = ensure_finite("resolve_state", "sqrt(mu / p)", (self.mu / p).sqrt())?;

        let position_pf = Vector3::new(r * cos_nu, r * sin_nu, 0.0);
        let velocity_pf = Vector3::new(-h_over_p * sin_nu, h_over_p * (e + cos_nu), 0.0);

        let rotation = perifocal_to_reference(elements);
        let state = StateVector {
            position_m: rotation * position_pf,
            velocity_m_s: rotation * velocity_pf,
        };

        if !state.position_m.is_finite() || !state.velocity_m_s.is_finite() {
            return Err(EngineError::numeric_domain(
                "resolve_state",
                MathErrorKind::NotFinite,
                "rotated state vector has non-finite components",
            ));
        }

        Ok(state)
    }

    /// Speed in km/s after rotation into the reference frame.
    pub fn resolve_velocity(&self, elements: &OrbitalElements) -> EngineResult<f64> {
        let state = self.resolve_state(elements)?;
        ensure_finite("resolve_velocity", "speed", state.speed_km_s())
    }
}

/// `Rz(−Ω)·Rx(−i)·Rz(−ω)` for the given elements.
pub fn perifocal_to_reference(elements: &OrbitalElements) -> RotationMatrix3 {
    let raan = elements.ascending_node_deg * DEG_TO_RAD;
    let inc = elements.inclination_deg * DEG_TO_RAD;
    let argp = elements.argument_of_periapsis_deg * DEG_TO_RAD;

    RotationMatrix3::about_z(-raan)
        * RotationMatrix3::about_x(-inc)
        * RotationMatrix3::about_z(-argp)
}

/// Resolves the full state around Earth.
pub fn resolve_state(elements: &OrbitalElements) -> EngineResult<StateVector> {
    OrbitalStateResolver::earth().resolve_state(elements)
}

/// Resolves the speed (km/s) around Earth.
pub fn resolve_velocity(elements: &OrbitalElements) -> EngineResult<f64> {
    OrbitalStateResolver::earth().resolve_velocity(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn vis_viva_km_s(el: &OrbitalElements, r_m: f64) -> f64 {
        let a = el.semi_major_axis_km * 1000.0;
        (MU_EARTH_M3_S2 * (2.0 / r_m - 1.0 / a)).sqrt() / 1000.0
    }

    #[test]
    fn test_leo_circular_speed() {
        let el = OrbitalElements::new(6771.0, 0.0, 51.6, 0.0, 0.0, 0.0).unwrap();
        let v = resolve_velocity(&el).unwrap();
        assert!((v - 7.67).abs() < 0.01, "LEO speed was {}", v);
    }

    #[test]
    fn test_circular_speed_independent_of_angles() {
        let a = OrbitalElements::new(7000.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        let b = OrbitalElements::new(7000.0, 0.0, 98.0, 123.0, 45.0, 270.0).unwrap();
        assert_relative_eq!(
            resolve_velocity(&a).unwrap(),
            resolve_velocity(&b).unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_periapsis_faster_than_apoapsis() {
        let peri = OrbitalElements::new(10_000.0, 0.3, 10.0, 20.0, 30.0, 0.0).unwrap();
        let apo = OrbitalElements::new(10_000.0, 0.3, 10.0, 20.0, 30.0, 180.0).unwrap();
        let vp = resolve_velocity(&peri).unwrap();
        let va = resolve_velocity(&apo).unwrap();
        assert!(vp > va);
        // Angular momentum conservation: r_p·v_p = r_a·v_a.
        assert_relative_eq!(vp * peri.periapsis_km(), va * apo.apoapsis_km(), max_relative = 1e-10);
    }

    #[test]
    fn test_polar_orbit_rotates_into_z() {
        let el = OrbitalElements::new(7000.0, 0.0, 90.0, 0.0, 0.0, 90.0).unwrap();
        let state = resolve_state(&el).unwrap();
        assert!(state.position_m.x.abs() < 1e-6);
        assert!(state.position_m.y.abs() < 1e-6);
        assert_relative_eq!(state.position_m.z, 7_000_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_equatorial_angular_momentum_along_z() {
        let el = OrbitalElements::new(8000.0, 0.2, 0.0, 30.0, 60.0, 45.0).unwrap();
        let state = resolve_state(&el).unwrap();
        let h = state.position_m.cross(&state.velocity_m_s);
        assert!(h.z > 0.0);
        assert!(h.x.abs() / h.z < 1e-12);
        assert!(h.y.abs() / h.z < 1e-12);
    }

    #[test]
    fn test_rotation_is_orthonormal() {
        let el = OrbitalElements::new(8000.0, 0.1, 63.4, 200.0, 270.0, 0.0).unwrap();
        let r = perifocal_to_reference(&el);
        assert!(r.is_rotation_matrix(1e-12));
    }

    #[test]
    fn test_degenerate_elements_rejected() {
        let mut el = OrbitalElements::circular(7000.0).unwrap();
        el.eccentricity = 1.0;
        let err = resolve_velocity(&el).unwrap_err();
        assert!(err.is_numeric_domain());

        el.eccentricity = 0.0;
        el.semi_major_axis_km = f64::INFINITY;
        let err = resolve_velocity(&el).unwrap_err();
        assert_eq!(err.math_kind(), Some(MathErrorKind::NotFinite));
    }

    #[test]
    fn test_custom_mu() {
        assert!(OrbitalStateResolver::with_mu(0.0).is_err());
        assert!(OrbitalStateResolver::with_mu(f64::NAN).is_err());

        let doubled = OrbitalStateResolver::with_mu(2.0 * MU_EARTH_M3_S2).unwrap();
        let el = OrbitalElements::circular(7000.0).unwrap();
        let v_earth = OrbitalStateResolver::default().resolve_velocity(&el).unwrap();
        let v_doubled = doubled.resolve_velocity(&el).unwrap();
        assert_relative_eq!(v_doubled, v_earth * 2f64.sqrt(), max_relative = 1e-12);
    }

    proptest! {
        #[test]
        fn prop_speed_matches_vis_viva(
            a in 6600.0f64..100_000.0,
            e in 0.0f64..0.99,
            i in 0.0f64..180.0,
            raan in 0.0f64..360.0,
            argp in 0.0f64..360.0,
            nu in 0.0f64..360.0,
        ) {
            let el = OrbitalElements::new(a, e, i, raan, argp, nu).unwrap();
            let state = resolve_state(&el).unwrap();
            let speed = state.speed_km_s();
            prop_assert!(speed.is_finite());
            prop_assert!(speed >= 0.0);
            let expected = vis_viva_km_s(&el, state.radius_m());
            prop_assert!((speed - expected).abs() <= 1e-9 * expected.max(1.0));
        }
    }
}
