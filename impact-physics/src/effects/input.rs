use std::fmt;

use impact_core::constants::{LAND_DENSITY_KG_M3, WATER_DENSITY_KG_M3};

/// Kind of surface the body strikes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TargetKind {
    Ocean,
    Coastal,
    Land,
}

impl TargetKind {
    /// Target density used by the crater scaling law, kg/m³.
    pub fn density_kg_m3(self) -> f64 {
        match self {
            TargetKind::Ocean | TargetKind::Coastal => WATER_DENSITY_KG_M3,
            TargetKind::Land => LAND_DENSITY_KG_M3,
        }
    }

    /// Water targets are the only ones that raise a tsunami.
    pub fn is_water(self) -> bool {
        matches!(self, TargetKind::Ocean | TargetKind::Coastal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Ocean => "ocean",
            TargetKind::Coastal => "coastal",
            TargetKind::Land => "land",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinematic description of an impactor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpactInput {
    /// Diameter in metres.
    pub diameter_m: f64,
    /// Entry speed in km/s.
    pub velocity_km_s: f64,
    /// Impact angle from the horizontal, degrees.
    pub angle_deg: f64,
    pub lat: f64,
    pub lng: f64,
}

impl ImpactInput {
    pub fn new(diameter_m: f64, velocity_km_s: f64, angle_deg: f64) -> Self {
        Self {
            diameter_m,
            velocity_km_s,
            angle_deg,
            lat: 0.0,
            lng: 0.0,
        }
    }

    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.lat = lat;
        self.lng = lng;
        self
    }

    pub fn with_velocity(mut self, velocity_km_s: f64) -> Self {
        self.velocity_km_s = velocity_km_s;
        self
    }
}

/// Estimated consequences of one impact, rounded for reporting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpactResult {
    pub energy_mt: f64,
    pub crater_diameter_km: f64,
    pub seismic_magnitude: f64,
    pub tsunami_height_m: f64,
    pub blast_radius_km: f64,
    pub affected_population: u64,
    pub impact_lat: f64,
    pub impact_lng: f64,
    pub target: TargetKind,
    /// Water depth assumed at the impact site. Reported under this name for
    /// compatibility with consumers that display it as elevation.
    pub elevation_m: f64,
    pub velocity_km_s: f64,
    pub asteroid_size_m: f64,
}
