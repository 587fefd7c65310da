//! Boundary to the SGP4 orbit-mechanics library.
//!
//! The `sgp4` crate turns two element lines into an orbital state and
//! propagates it to a TEME position/velocity. Everything past that point
//! (sidereal time, the conversion down to geodetic latitude/longitude) is
//! thin boundary math kept here. Angles are radians internally and degrees
//! at the geodetic boundary; lengths are kilometers.

use chrono::{DateTime, Utc};

use crate::error::TrackerError;
use crate::geo::wrap_longitude;

/// WGS84 equatorial radius, km.
const WGS84_A_KM: f64 = 6378.137;
/// WGS84 flattening.
const WGS84_F: f64 = 1.0 / 298.257223563;

/// TEME position/velocity at one instant, km and km/s.
#[derive(Debug, Clone, Copy)]
pub struct TemeState {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

impl TemeState {
    /// Euclidean magnitude of the velocity vector, km/s.
    pub fn speed(&self) -> f64 {
        let [vx, vy, vz] = self.velocity;
        (vx * vx + vy * vy + vz * vz).sqrt()
    }
}

/// Geodetic position derived from an inertial one. Longitude already wrapped
/// into `[-180, 180]`; height above the ellipsoid in km.
#[derive(Debug, Clone, Copy)]
pub struct GeodeticPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub height_km: f64,
}

/// Opaque orbital-state handle for one object, built once at parse time.
pub struct OrbitalState {
    elements: sgp4::Elements,
    constants: sgp4::Constants,
}

impl OrbitalState {
    /// Parses a pair of fixed-width element lines. Rejection by the
    /// propagation library is an `ElementsRejected` error; the caller drops
    /// the object and continues.
    pub fn from_tle(name: &str, line1: &str, line2: &str) -> Result<Self, TrackerError> {
        let elements = sgp4::Elements::from_tle(
            Some(name.to_string()),
            line1.as_bytes(),
            line2.as_bytes(),
        )
        .map_err(|e| TrackerError::ElementsRejected {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        let constants =
            sgp4::Constants::from_elements(&elements).map_err(|e| TrackerError::ElementsRejected {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            elements,
            constants,
        })
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    /// Reference epoch of the element set.
    pub fn epoch(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.elements.datetime, Utc)
    }

    /// Propagates to a wall-clock instant. Failure (numerical divergence,
    /// instant not representable against the epoch) means the object simply
    /// is not updated this tick.
    pub fn propagate_at(&self, instant: DateTime<Utc>) -> Result<TemeState, TrackerError> {
        let number = self.elements.norad_id.to_string();
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&instant.naive_utc())
            .map_err(|e| TrackerError::PropagationUnavailable {
                number: number.clone(),
                reason: e.to_string(),
            })?;

        let prediction =
            self.constants
                .propagate(minutes)
                .map_err(|e| TrackerError::PropagationUnavailable {
                    number,
                    reason: e.to_string(),
                })?;

        Ok(TemeState {
            position: prediction.position,
            velocity: prediction.velocity,
        })
    }
}

/// Greenwich mean sidereal time for an instant, radians in `[0, 2π)`.
pub fn gmst(instant: DateTime<Utc>) -> f64 {
    let julian_date = instant.timestamp_millis() as f64 / 86_400_000.0 + 2_440_587.5;
    let days_since_j2000 = julian_date - 2_451_545.0;
    let degrees = 280.460_618_37 + 360.985_647_366_29 * days_since_j2000;
    degrees.to_radians().rem_euclid(std::f64::consts::TAU)
}

/// Converts a TEME position to geodetic coordinates using the sidereal time
/// of the same instant. Latitude is found iteratively on the WGS84 ellipsoid.
pub fn teme_to_geodetic(position: [f64; 3], gmst: f64) -> GeodeticPosition {
    let [x, y, z] = position;
    let e2 = WGS84_F * (2.0 - WGS84_F);

    let longitude_deg = wrap_longitude((y.atan2(x) - gmst).to_degrees());

    let r = (x * x + y * y).sqrt();
    let mut latitude = z.atan2(r);
    let mut c = 1.0;
    for _ in 0..20 {
        let sin_lat = latitude.sin();
        c = 1.0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = (z + WGS84_A_KM * c * e2 * sin_lat).atan2(r);
        if (next - latitude).abs() < 1e-12 {
            latitude = next;
            break;
        }
        latitude = next;
    }

    let height_km = r / latitude.cos() - WGS84_A_KM * c;

    GeodeticPosition {
        latitude_deg: latitude.to_degrees(),
        longitude_deg,
        height_km,
    }
}
