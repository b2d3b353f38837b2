//! Foundation types shared by the impact engine crates.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`errors`] | [`EngineError`], [`MathErrorKind`] and the [`EngineResult`] alias |
//! | [`constants`] | Physical constants and unit conversions used by the scaling laws |
//! | [`matrix`] | [`RotationMatrix3`] and [`Vector3`] for perifocal frame rotations |
//!
//! Nothing in this crate performs I/O. Everything is `Send + Sync` and can be
//! shared freely between request handlers.

pub mod constants;
pub mod errors;
pub mod matrix;

pub use errors::{EngineError, EngineResult, MathErrorKind};
pub use matrix::{RotationMatrix3, Vector3};
