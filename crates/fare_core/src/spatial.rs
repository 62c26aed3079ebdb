//! Spatial operations: great-circle distance between ping positions.
//!
//! The fare pipeline consumes distance through the [`DistanceProvider`] seam
//! so callers can swap the Haversine default for another backend (or a fixed
//! distance in tests).

use h3o::LatLng;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the fallback formula, in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Source of distances between two positions. Must be symmetric and
/// non-negative.
pub trait DistanceProvider {
    fn distance_km(&self, from: GeoPoint, to: GeoPoint) -> f64;
}

impl<F> DistanceProvider for F
where
    F: Fn(GeoPoint, GeoPoint) -> f64,
{
    fn distance_km(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        self(from, to)
    }
}

/// Haversine distance on the H3 reference sphere.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineDistance;

impl DistanceProvider for HaversineDistance {
    fn distance_km(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        match (LatLng::new(from.lat, from.lng), LatLng::new(to.lat, to.lng)) {
            (Ok(a), Ok(b)) => a.distance_km(b),
            // h3o refuses non-finite input; parsed pings are always finite.
            _ => haversine_km(from, to),
        }
    }
}

fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lng.to_radians());
    let sin_dlat = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon = ((lon2 - lon1) * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
