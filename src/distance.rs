//! Distance metrics used as edge weights.
//!
//! `PlanarMetric` is the default: a flat-earth approximation that treats one
//! degree of either axis as 111 km. It is only meaningful at regional scale
//! and degrades near the poles and across the date line.
//! `HaversineMetric` gives great-circle distance for callers that need it.

use crate::traits::DistanceMetric;

/// Kilometers per degree used by the planar approximation.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Round to two decimal places, the precision of every emitted distance.
///
/// The decision is made on the exact binary value: scaling by 100 first can
/// land on a spurious .5 and round the wrong way.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Planar approximation: euclidean distance in degrees scaled by 111 km.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarMetric;

impl DistanceMetric for PlanarMetric {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        let d_lat = from.0 - to.0;
        let d_lon = from.1 - to.1;
        (d_lat * d_lat + d_lon * d_lon).sqrt() * KM_PER_DEGREE
    }
}

/// Great-circle distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineMetric;

impl HaversineMetric {
    fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lon1) = from;
        let (lat2, lon2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lon = (lon2 - lon1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        // Clamp guards asin against a drifting just above 1.0 for antipodes.
        let c = 2.0 * a.sqrt().min(1.0).asin();

        EARTH_RADIUS_KM * c
    }
}

impl DistanceMetric for HaversineMetric {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        Self::haversine_km(from, to)
    }
}
