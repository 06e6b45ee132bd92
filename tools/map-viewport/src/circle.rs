//! Geodesic circles on a spherical Earth.

use crate::point::Point;
use std::f64::consts::PI;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Boundary points generated for every circle feature.
pub const DEFAULT_SEGMENTS: usize = 64;

/// Approximates the circle of `radius_m` meters around `center` with
/// `segments` boundary points at equally spaced bearings, starting due north
/// and turning clockwise.
///
/// Longitudes are wrapped into [-180, 180].
pub fn circle_points(center: Point, radius_m: f64, segments: usize) -> Vec<Point> {
    let lat0 = center.lat().to_radians();
    let lon0 = center.lon().to_radians();
    let delta = radius_m / EARTH_RADIUS_M;

    let (sin_lat0, cos_lat0) = lat0.sin_cos();
    let (sin_delta, cos_delta) = delta.sin_cos();

    (0..segments)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / segments as f64;
            let (sin_theta, cos_theta) = theta.sin_cos();

            let lat = (sin_lat0 * cos_delta + cos_lat0 * sin_delta * cos_theta).asin();
            let lon = lon0
                + (sin_theta * sin_delta * cos_lat0).atan2(cos_delta - sin_lat0 * lat.sin());

            Point::clamped(lat.to_degrees(), wrap_lon(lon.to_degrees()))
        })
        .collect()
}

fn wrap_lon(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Great-circle distance in meters (haversine).
pub fn haversine_m(a: Point, b: Point) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let delta_lat = (b.lat() - a.lat()).to_radians();
    let delta_lon = (b.lon() - a.lon()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}
