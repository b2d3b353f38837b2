//! Asteroid impact physics.
//!
//! Two pure, synchronous engines plus a set of deflection estimators:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`orbit`] | [`OrbitalElements`] → reference-frame speed ([`resolve_velocity`]) |
//! | [`effects`] | [`ImpactInput`] → impact effects ([`compute_impact_effects`]) |
//! | [`mitigation`] | Kinetic impactor, gravity tractor and nuclear disruption estimates |
//!
//! # Quick Start
//!
//! ```
//! use impact_physics::{simulate, ImpactInput, OrbitalElements, SimulationRequest};
//!
//! let input = ImpactInput::new(100.0, 20.0, 45.0).with_location(34.05, -118.24);
//! let result = simulate(&SimulationRequest::new(input)).unwrap();
//! assert!(result.energy_mt > 10.0);
//!
//! // Speed derived from orbital elements instead of the supplied 20 km/s
//! let orbit = OrbitalElements::new(6771.0, 0.0, 51.6, 0.0, 0.0, 0.0).unwrap();
//! let request = SimulationRequest::new(input).with_orbit(orbit);
//! let result = simulate(&request).unwrap();
//! assert!((result.velocity_km_s - 7.67).abs() < 0.01);
//! ```
//!
//! # Numeric Policy
//!
//! The orbit resolver rejects degenerate input with
//! [`EngineError::NumericDomain`](impact_core::EngineError::NumericDomain).
//! The effects calculator never fails: a sub-computation that would produce
//! NaN or infinity reports 0 instead.
//!
//! # Features
//!
//! - **`serde`**: `Serialize`/`Deserialize` for the request and result types.

pub mod effects;
pub mod mitigation;
pub mod orbit;

pub use effects::{
    compute_impact_effects, simulate, ImpactInput, ImpactResult, SimulationRequest, TargetKind,
};
pub use mitigation::{gravity_tractor, kinetic_impactor, nuclear_disruption, NuclearEstimate};
pub use orbit::{
    resolve_state, resolve_velocity, OrbitalElements, OrbitalStateResolver, StateVector,
};

pub use impact_core::{EngineError, EngineResult};
