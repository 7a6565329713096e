// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Scale factor at the natural origin. 1 is used instead of UTM's 0.9996,
/// as the projected coordinates are only ever compared with each other.
const K0: f64 = 1.0;

/// Projection maps lat-lon positions onto a plane using the
/// [transverse Mercator projection](https://en.wikipedia.org/wiki/Transverse_Mercator_projection)
/// centered at a fixed origin.
///
/// Projected coordinates are unitless (radians on a unit sphere) and are only
/// meaningful when compared with each other. They feed the [SpatialIndex](crate::SpatialIndex)
/// and must never be used as route costs - see [earth_distance](crate::earth_distance) for that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    origin_lat: f64,
    origin_lon: f64,
}

impl Projection {
    /// Creates a projection centered at the given position.
    pub fn new(origin_lon: f64, origin_lat: f64) -> Self {
        Self {
            origin_lat,
            origin_lon,
        }
    }

    /// Creates a projection centered at the middle of a bounding box, given as
    /// `[min_lon, min_lat, max_lon, max_lat]`.
    pub fn centered_on(bbox: [f64; 4]) -> Self {
        let [min_lon, min_lat, max_lon, max_lat] = bbox;
        Self::new((min_lon + max_lon) * 0.5, (min_lat + max_lat) * 0.5)
    }

    /// Returns the `(lon, lat)` origin of this projection.
    pub fn origin(&self) -> (f64, f64) {
        (self.origin_lon, self.origin_lat)
    }

    /// Projects a position onto the plane, returning `(x, y)`.
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let dlon = (lon - self.origin_lon).to_radians();
        let phi = lat.to_radians();

        let b = dlon.sin() * phi.cos();
        let x = (K0 / 2.0) * ((1.0 + b) / (1.0 - b)).ln();
        let y = K0 * ((phi.tan() / dlon.cos()).atan() - self.origin_lat.to_radians());
        (x, y)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-9),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    #[test]
    fn origin_maps_to_zero() {
        let p = Projection::new(-122.2595, 37.8705);
        let (x, y) = p.project(-122.2595, 37.8705);
        assert_almost_eq!(x, 0.0);
        assert_almost_eq!(y, 0.0);
    }

    #[test]
    fn axes_follow_compass() {
        let p = Projection::new(-122.2595, 37.8705);

        let (x_east, y_east) = p.project(-122.25, 37.8705);
        assert!(x_east > 0.0);
        assert!(y_east.abs() < 1e-6);

        let (x_north, y_north) = p.project(-122.2595, 37.88);
        assert_almost_eq!(x_north, 0.0);
        assert_almost_eq!(y_north, (37.88f64 - 37.8705).to_radians());
    }

    #[test]
    fn near_origin_is_locally_flat() {
        // One arc-minute east of the origin, on the equator
        let p = Projection::default();
        let (x, y) = p.project(1.0 / 60.0, 0.0);
        assert!((x - (1.0f64 / 60.0).to_radians()).abs() < 1e-10);
        assert_almost_eq!(y, 0.0);
    }

    #[test]
    fn centered_on_bbox() {
        let p = Projection::centered_on([-122.30, 37.82, -122.20, 37.90]);
        let (lon, lat) = p.origin();
        assert_almost_eq!(lon, -122.25);
        assert_almost_eq!(lat, 37.86);
    }
}
