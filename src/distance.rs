// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Radius of Earth used for all route costs, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Calculates the great-circle distance between two lat-lon positions
/// on a sphere with the given `radius` using the
/// [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
/// The result is in the same unit as `radius`.
pub fn earth_distance(radius: f64, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (lon2 - lon1).to_radians();

    let sin_dlat_half = (dlat * 0.5).sin();
    let sin_dlon_half = (dlon * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    // Rounding may push h slightly outside of [0, 1] for antipodal points
    let h = h.clamp(0.0, 1.0);
    2.0 * radius * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Calculates the initial bearing (forward azimuth) of the great-circle arc
/// from the first to the second position, in degrees.
///
/// The result is in the range (-180, 180], with 0 pointing north and
/// positive values turning clockwise (90 is east, -90 is west).
pub fn initial_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();
    y.atan2(x).to_degrees()
}
