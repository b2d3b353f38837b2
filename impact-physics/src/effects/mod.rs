//! Simplified impact effect scaling laws.
//!
//! [`compute_impact_effects`] turns an [`ImpactInput`] into an
//! [`ImpactResult`]. It never fails: each sub-computation is guarded and
//! reports 0 when it would otherwise produce NaN or infinity.
//!
//! [`simulate`] is the request-level entry point. When a
//! [`SimulationRequest`] carries orbital elements the resolved speed replaces
//! the supplied one before the scaling laws run.

mod calculator;
mod input;
mod simulation;

pub use calculator::{
    affected_population, blast_radius_km, compute_impact_effects, crater_diameter_m,
    kinetic_energy_joules, seismic_magnitude, tsunami_height_m, ASSUMED_TARGET,
};
pub use input::{ImpactInput, ImpactResult, TargetKind};
pub use simulation::{simulate, SimulationRequest};
