use std::f64::consts::PI;

use impact_core::constants::{
    ASTEROID_DENSITY_KG_M3, AVERAGE_OCEAN_DEPTH_M, BASE_POPULATION_DENSITY_PER_KM2, DEG_TO_RAD,
    JOULES_PER_MEGATON, METERS_PER_KILOMETER, TSUNAMI_REFERENCE_DEPTH_M,
};

use super::{ImpactInput, ImpactResult, TargetKind};

/// Every impact is treated as an ocean strike; the site's real elevation is
/// not consulted.
pub const ASSUMED_TARGET: TargetKind = TargetKind::Ocean;

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Decimal rounding of the exact binary value, ties to even.
fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    format!("{:.*}", decimals, value).parse().unwrap_or(0.0)
}

/// `½·m·v²` for a sphere of asteroid density, joules.
pub fn kinetic_energy_joules(diameter_m: f64, velocity_m_s: f64) -> f64 {
    let radius = non_negative(diameter_m) / 2.0;
    let volume = 4.0 / 3.0 * PI * radius.powi(3);
    let mass = ASTEROID_DENSITY_KG_M3 * volume;
    finite_or_zero(0.5 * mass * velocity_m_s * velocity_m_s)
}

/// Simplified Holsapple-Schmidt transient crater diameter, metres.
///
/// Speed is floored at 1 m/s and the angle factor at `sin θ = 0.1`, so a
/// grazing or stationary body still yields a small crater as long as it has
/// size.
pub fn crater_diameter_m(
    diameter_m: f64,
    velocity_m_s: f64,
    angle_deg: f64,
    target: TargetKind,
) -> f64 {
    let density_ratio = target.density_kg_m3() / ASTEROID_DENSITY_KG_M3;
    let angle_factor = (angle_deg * DEG_TO_RAD).sin().max(0.1);
    finite_or_zero(
        1.161
            * density_ratio.cbrt()
            * non_negative(diameter_m).powf(0.78)
            * velocity_m_s.max(1.0).powf(0.44)
            * angle_factor.cbrt(),
    )
}

/// Empirical `0.67·log10(E) − 5.87`. Zero for non-positive energy; may be
/// negative for very small energies.
pub fn seismic_magnitude(kinetic_energy_j: f64) -> f64 {
    if kinetic_energy_j > 0.0 {
        finite_or_zero(0.67 * kinetic_energy_j.log10() - 5.87)
    } else {
        0.0
    }
}

/// Deep-water tsunami amplitude, metres. Zero for land targets.
pub fn tsunami_height_m(energy_mt: f64, depth_m: f64, target: TargetKind) -> f64 {
    if !target.is_water() || !(depth_m >= 0.0) {
        return 0.0;
    }
    let depth_factor = (depth_m.max(1.0) / TSUNAMI_REFERENCE_DEPTH_M).powf(-0.25);
    finite_or_zero(8.5 * non_negative(energy_mt).sqrt() * depth_factor)
}

/// Air blast radius, km.
pub fn blast_radius_km(energy_mt: f64) -> f64 {
    finite_or_zero(3.0 * non_negative(energy_mt).powf(0.33))
}

/// People inside the blast circle at a uniform density. Truncated.
pub fn affected_population(blast_radius_km: f64) -> u64 {
    let people = PI * blast_radius_km * blast_radius_km * BASE_POPULATION_DENSITY_PER_KM2;
    non_negative(people) as u64
}

/// Runs every scaling law for one impactor.
///
/// Negative or non-finite size and speed are treated as 0. Location passes
/// through unchanged.
pub fn compute_impact_effects(input: &ImpactInput) -> ImpactResult {
    let diameter_m = non_negative(input.diameter_m);
    let velocity_km_s = non_negative(input.velocity_km_s);
    let velocity_m_s = velocity_km_s * METERS_PER_KILOMETER;
    let target = ASSUMED_TARGET;
    let depth_m = AVERAGE_OCEAN_DEPTH_M;

    let kinetic_energy = kinetic_energy_joules(diameter_m, velocity_m_s);
    let energy_mt = finite_or_zero(kinetic_energy / JOULES_PER_MEGATON);
    let crater_km =
        crater_diameter_m(diameter_m, velocity_m_s, input.angle_deg, target) / METERS_PER_KILOMETER;
    let magnitude = seismic_magnitude(kinetic_energy);
    let tsunami = tsunami_height_m(energy_mt, depth_m, target);
    let blast_km = blast_radius_km(energy_mt);
    let population = affected_population(blast_km);

    ImpactResult {
        energy_mt: round_to(energy_mt, 2),
        crater_diameter_km: round_to(crater_km, 2),
        seismic_magnitude: non_negative(round_to(magnitude, 1)),
        tsunami_height_m: round_to(tsunami, 1),
        blast_radius_km: round_to(blast_km, 2),
        affected_population: population,
        impact_lat: input.lat,
        impact_lng: input.lng,
        target,
        elevation_m: round_to(depth_m, 2),
        velocity_km_s: round_to(velocity_km_s, 2),
        asteroid_size_m: round_to(diameter_m, 2),
    }
}
