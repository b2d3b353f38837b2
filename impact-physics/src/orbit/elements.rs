use impact_core::{EngineError, EngineResult, MathErrorKind};

/// Classical orbital elements of an elliptical orbit.
///
/// Lengths are in kilometres and angles in degrees, matching how elements are
/// usually published. [`OrbitalElements::new`] validates the set; the
/// resolver validates again, so a struct literal with bad values still cannot
/// produce a silent NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrbitalElements {
    /// Semi-major axis `a` in km.
    pub semi_major_axis_km: f64,
    /// Eccentricity `e`, in `[0, 1)`.
    pub eccentricity: f64,
    /// Inclination `i` in degrees.
    pub inclination_deg: f64,
    /// Longitude of the ascending node `Ω` in degrees.
    pub ascending_node_deg: f64,
    /// Argument of periapsis `ω` in degrees.
    pub argument_of_periapsis_deg: f64,
    /// True anomaly `ν` in degrees.
    pub true_anomaly_deg: f64,
}

impl OrbitalElements {
    pub fn new(
        semi_major_axis_km: f64,
        eccentricity: f64,
        inclination_deg: f64,
        ascending_node_deg: f64,
        argument_of_periapsis_deg: f64,
        true_anomaly_deg: f64,
    ) -> EngineResult<Self> {
        let elements = Self {
            semi_major_axis_km,
            eccentricity,
            inclination_deg,
            ascending_node_deg,
            argument_of_periapsis_deg,
            true_anomaly_deg,
        };
        elements.validate()?;
        Ok(elements)
    }

    /// Circular orbit with all angles zero.
    pub fn circular(semi_major_axis_km: f64) -> EngineResult<Self> {
        Self::new(semi_major_axis_km, 0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Checks finiteness, `a > 0` and `0 ≤ e < 1`.
    ///
    /// Parabolic and hyperbolic orbits are rejected rather than clamped: the
    /// polar equation used by the resolver has no meaning for them.
    pub fn validate(&self) -> EngineResult<()> {
        let fields = [
            ("semi_major_axis_km", self.semi_major_axis_km),
            ("eccentricity", self.eccentricity),
            ("inclination_deg", self.inclination_deg),
            ("ascending_node_deg", self.ascending_node_deg),
            ("argument_of_periapsis_deg", self.argument_of_periapsis_deg),
            ("true_anomaly_deg", self.true_anomaly_deg),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(EngineError::numeric_domain(
                    "OrbitalElements::validate",
                    MathErrorKind::NotFinite,
                    &format!("{} is not finite ({})", name, value),
                ));
            }
        }

        if self.semi_major_axis_km <= 0.0 {
            return Err(EngineError::numeric_domain(
                "OrbitalElements::validate",
                MathErrorKind::OutOfRange,
                &format!(
                    "semi-major axis must be positive, got {} km",
                    self.semi_major_axis_km
                ),
            ));
        }

        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(EngineError::numeric_domain(
                "OrbitalElements::validate",
                MathErrorKind::OutOfRange,
                &format!(
                    "eccentricity {} outside [0, 1); only elliptical orbits are supported",
                    self.eccentricity
                ),
            ));
        }

        Ok(())
    }

    /// Semi-latus rectum `p = a(1 − e²)` in metres.
    pub fn semi_latus_rectum_m(&self) -> f64 {
        self.semi_major_axis_km * 1000.0 * (1.0 - self.eccentricity * self.eccentricity)
    }

    pub fn periapsis_km(&self) -> f64 {
        self.semi_major_axis_km * (1.0 - self.eccentricity)
    }

    pub fn apoapsis_km(&self) -> f64 {
        self.semi_major_axis_km * (1.0 + self.eccentricity)
    }
}
