//! Physical constants and unit conversions.
//!
//! The impact scaling laws are simplified empirical relations, so most of
//! these values are reporting conventions rather than measured quantities.

/// Earth's standard gravitational parameter in m³/s².
pub const MU_EARTH_M3_S2: f64 = 3.986004418e14;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Standard gravitational acceleration in m/s².
pub const STANDARD_GRAVITY_M_S2: f64 = 9.81;

/// Newtonian constant of gravitation in m³/(kg·s²) (CODATA 2018).
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67430e-11;

/// Bulk density of a stony asteroid in kg/m³.
pub const ASTEROID_DENSITY_KG_M3: f64 = 3000.0;

/// Density of sea water in kg/m³.
pub const WATER_DENSITY_KG_M3: f64 = 1025.0;

/// Density of continental crust in kg/m³.
pub const LAND_DENSITY_KG_M3: f64 = 2700.0;

/// Average ocean depth in metres, used in place of a bathymetry lookup.
pub const AVERAGE_OCEAN_DEPTH_M: f64 = 4000.0;

/// Reference depth of the tsunami scaling law in metres.
pub const TSUNAMI_REFERENCE_DEPTH_M: f64 = 4000.0;

/// Global average population density in people per km².
pub const BASE_POPULATION_DENSITY_PER_KM2: f64 = 150.0;

/// Joules per megaton of TNT.
pub const JOULES_PER_MEGATON: f64 = 4.184e15;

pub const METERS_PER_KILOMETER: f64 = 1000.0;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// 365-day year in seconds.
pub const SECONDS_PER_YEAR: f64 = 31_536_000.0;

#[allow(clippy::excessive_precision)]
pub const DEG_TO_RAD: f64 = 1.745329251994329576923691e-2;

#[allow(clippy::excessive_precision)]
pub const RAD_TO_DEG: f64 = 57.29577951308232087679815;
