use geo::{Distance, Geodesic, Point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

pub const INDIA: RegionBounds = RegionBounds {
    lat_min: 8.4,
    lat_max: 37.6,
    lon_min: 68.7,
    lon_max: 97.25,
};

pub const OUT_OF_REGION_WARNING: &str = "Coordinates must be within India boundaries!";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// Inclusive on both axes. NaN fails every comparison and is therefore outside.
pub fn is_within_region(lat: f64, lon: f64, bounds: &RegionBounds) -> bool {
    (bounds.lat_min..=bounds.lat_max).contains(&lat)
        && (bounds.lon_min..=bounds.lon_max).contains(&lon)
}

/// Distance over the WGS-84 ellipsoid in kilometres.
///
/// The pair is put into a canonical order first so `d(a, b)` and `d(b, a)`
/// run the exact same computation.
pub fn geodesic_distance_km(a: LatLon, b: LatLon) -> f64 {
    if a == b {
        return 0.0;
    }
    let (first, second) = if (a.lat, a.lon) <= (b.lat, b.lon) {
        (a, b)
    } else {
        (b, a)
    };
    let meters = Geodesic.distance(first.to_point(), second.to_point());
    (meters / 1000.0).max(0.0)
}

/// Both endpoints must be inside `bounds`; otherwise no distance exists.
pub fn trip_distance_km(origin: LatLon, destination: LatLon, bounds: &RegionBounds) -> Option<f64> {
    if !is_within_region(origin.lat, origin.lon, bounds)
        || !is_within_region(destination.lat, destination.lon, bounds)
    {
        tracing::warn!(
            "coordinates outside region: origin=({}, {}) destination=({}, {})",
            origin.lat,
            origin.lon,
            destination.lat,
            destination.lon
        );
        return None;
    }
    Some(geodesic_distance_km(origin, destination))
}
