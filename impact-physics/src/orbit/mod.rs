//! Keplerian elements to impact speed.
//!
//! The resolver places the body on its conic with the polar equation
//! `r = a(1 − e²)/(1 + e·cos ν)`, builds the two-body velocity in the
//! perifocal frame and rotates both vectors into the reference frame with
//! `Rz(−Ω)·Rx(−i)·Rz(−ω)`. Only elliptical orbits (`0 ≤ e < 1`) are supported.

mod elements;
mod resolver;

pub use elements::OrbitalElements;
pub use resolver::{
    perifocal_to_reference, resolve_state, resolve_velocity, OrbitalStateResolver, StateVector,
};
