use impact_core::EngineResult;
use tracing::debug;

use super::{compute_impact_effects, ImpactInput, ImpactResult};
use crate::orbit::{resolve_velocity, OrbitalElements};

/// One simulation run: the impactor plus optional orbital elements.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationRequest {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub input: ImpactInput,
    #[cfg_attr(feature = "serde", serde(default))]
    pub orbit: Option<OrbitalElements>,
}

impl SimulationRequest {
    pub fn new(input: ImpactInput) -> Self {
        Self { input, orbit: None }
    }

    /// Resolve the impact speed from these elements instead of
    /// `input.velocity_km_s`.
    pub fn with_orbit(mut self, orbit: OrbitalElements) -> Self {
        self.orbit = Some(orbit);
        self
    }
}

/// Resolves the speed when elements are present, then runs the scaling laws.
///
/// Degenerate elements are an error here rather than a zero speed.
pub fn simulate(request: &SimulationRequest) -> EngineResult<ImpactResult> {
    let mut input = request.input;

    if let Some(orbit) = &request.orbit {
        let speed = resolve_velocity(orbit)?;
        debug!(
            supplied_km_s = input.velocity_km_s,
            resolved_km_s = speed,
            "impact speed resolved from orbital elements"
        );
        input.velocity_km_s = speed;
    }

    let result = compute_impact_effects(&input);
    debug!(
        energy_mt = result.energy_mt,
        blast_radius_km = result.blast_radius_km,
        affected_population = result.affected_population,
        "impact simulated"
    );
    Ok(result)
}
