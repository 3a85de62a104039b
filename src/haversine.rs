//! Great-circle distances between route points.
//!
//! Uses the haversine formula on a sphere with the WGS84 equatorial radius,
//! which is what osmdroid-style map libraries report for point distances.

use crate::geo_point::GeoPoint;

/// Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Haversine distance between two points in meters.
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1_rad = a.latitude().to_radians();
    let lat2_rad = b.latitude().to_radians();
    let delta_lat = (b.latitude() - a.latitude()).to_radians();
    let delta_lng = (b.longitude() - a.longitude()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Total length of a path in meters. Zero for fewer than two points.
pub fn path_length(points: &[GeoPoint]) -> f64 {
    points.windows(2).map(|pair| distance(&pair[0], &pair[1])).sum()
}
