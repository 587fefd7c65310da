//! Longitude continuity normalization and ground distance.
//!
//! On a horizontally-infinite map the same physical point has infinitely many
//! longitude representations 360° apart. Markers and line endpoints must all
//! be normalized against the same reference (the current view center) or
//! rendered geometry jumps to the wrong copy of the world.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, the sphere the coverage distance is
/// measured on.
pub const EARTH_MEAN_RADIUS_METERS: f64 = 6_371_000.0;

/// A geodetic surface point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Wraps a longitude into `[-180, 180]`, for canonicalizing a raw geodetic
/// reading when no view reference is meaningful.
pub fn wrap_longitude(mut longitude: f64) -> f64 {
    while longitude < -180.0 {
        longitude += 360.0;
    }
    while longitude > 180.0 {
        longitude -= 360.0;
    }
    longitude
}

/// Wraps a longitude to the representation nearest `center`.
///
/// The result is congruent with the input mod 360 and within 180° of the
/// reference. Idempotent for a fixed reference.
pub fn wrap_to_center(mut longitude: f64, center: f64) -> f64 {
    while longitude - center > 180.0 {
        longitude -= 360.0;
    }
    while longitude - center < -180.0 {
        longitude += 360.0;
    }
    longitude
}

/// Great-circle surface distance between two points, in meters.
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_MEAN_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_longitude_stays_in_range() {
        assert_eq!(wrap_longitude(0.0), 0.0);
        assert_eq!(wrap_longitude(190.0), -170.0);
        assert_eq!(wrap_longitude(-190.0), 170.0);
        assert_eq!(wrap_longitude(720.0 + 15.0), 15.0);
        assert_eq!(wrap_longitude(-720.0 - 15.0), -15.0);
    }

    #[test]
    fn wrap_to_center_is_within_half_turn_and_congruent() {
        let longitudes = [-1000.0, -540.0, -180.0, -12.5, 0.0, 77.0, 180.0, 359.0, 1234.0];
        let centers = [-720.0, -180.0, -30.0, 0.0, 45.0, 179.0, 360.0, 1000.0];
        for &lon in &longitudes {
            for &center in &centers {
                let wrapped = wrap_to_center(lon, center);
                assert!(
                    (wrapped - center).abs() <= 180.0,
                    "wrap_to_center({lon}, {center}) = {wrapped} is farther than 180 from the center"
                );
                let delta = (wrapped - lon) / 360.0;
                assert!(
                    (delta - delta.round()).abs() < 1e-9,
                    "wrap_to_center({lon}, {center}) = {wrapped} is not congruent mod 360"
                );
            }
        }
    }

    #[test]
    fn wrap_to_center_is_idempotent() {
        for lon in [-500.0, -170.0, 0.0, 170.0, 500.0] {
            for center in [-200.0, 0.0, 150.0] {
                let once = wrap_to_center(lon, center);
                assert_eq!(wrap_to_center(once, center), once);
            }
        }
    }

    #[test]
    fn haversine_zero_for_identical_points() {
        let p = GeoPoint::new(51.5, -0.12);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn haversine_quarter_meridian() {
        // Equator to pole along a meridian is a quarter of the great circle.
        let equator = GeoPoint::new(0.0, 10.0);
        let pole = GeoPoint::new(90.0, 10.0);
        let expected = std::f64::consts::PI * EARTH_MEAN_RADIUS_METERS / 2.0;
        assert!((haversine_distance(equator, pole) - expected).abs() < 1.0);
    }

    #[test]
    fn haversine_one_degree_of_longitude_at_equator() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let expected = EARTH_MEAN_RADIUS_METERS * 1.0_f64.to_radians();
        assert!((haversine_distance(a, b) - expected).abs() < 1.0);
    }
}
