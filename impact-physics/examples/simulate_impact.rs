use impact_physics::{
    gravity_tractor, kinetic_impactor, nuclear_disruption, resolve_state, simulate, ImpactInput,
    OrbitalElements, SimulationRequest,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // --- Direct kinematic input ---
    // A 100 m stony body at 20 km/s, 45° off the horizontal, off Los Angeles.

    let input = ImpactInput::new(100.0, 20.0, 45.0).with_location(34.05, -118.24);
    let result = simulate(&SimulationRequest::new(input))?;

    println!("Kinematic input ({} m at {} km/s):", input.diameter_m, input.velocity_km_s);
    println!("  energy     = {:.2} Mt TNT", result.energy_mt);
    println!("  crater     = {:.2} km", result.crater_diameter_km);
    println!("  magnitude  = {:.1}", result.seismic_magnitude);
    println!("  tsunami    = {:.1} m", result.tsunami_height_m);
    println!("  blast      = {:.2} km", result.blast_radius_km);
    println!("  population = {}", result.affected_population);
    println!("  target     = {}", result.target);
    println!();

    // --- Speed from orbital elements ---

    let orbit = OrbitalElements::new(6771.0, 0.0, 51.6, 0.0, 0.0, 0.0)?;
    let state = resolve_state(&orbit)?;
    println!("Circular orbit a = {} km:", orbit.semi_major_axis_km);
    println!("  position = {} m", state.position_m);
    println!("  velocity = {} m/s", state.velocity_m_s);
    println!("  speed    = {:.3} km/s", state.speed_km_s());

    let result = simulate(&SimulationRequest::new(input).with_orbit(orbit))?;
    println!("  energy at orbital speed = {:.2} Mt", result.energy_mt);
    println!();

    // Hyperbolic elements are rejected, not clamped.
    match OrbitalElements::new(6771.0, 1.2, 0.0, 0.0, 0.0, 0.0) {
        Ok(_) => println!("unexpected: hyperbolic orbit accepted"),
        Err(e) => println!("Rejected: {e}"),
    }
    println!();

    // --- Deflection estimates ---

    println!("Deflection:");
    println!(
        "  kinetic impactor, 2 cm/s, 5 yr lead = {:.0} km",
        kinetic_impactor(0.02, 5.0 * 365.0)?
    );
    println!(
        "  gravity tractor, 20 t at 150 m for 10 yr = {:.3e} m/s",
        gravity_tractor(6.1e10, 20_000.0, 150.0, 10.0)?
    );
    let nuclear = nuclear_disruption(1.2)?;
    println!(
        "  nuclear, 1.2 Mt: p = {:.4}, fragments = {}",
        nuclear.fragmentation_probability, nuclear.estimated_fragments
    );

    Ok(())
}
