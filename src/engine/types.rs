//! Core data model for the tracked constellation.

use crate::geo::GeoPoint;
use crate::orbit::OrbitalState;

/// Fixed ground-distance threshold within which a satellite provides
/// service to a location, meters. Shared by the coverage engine and the
/// circle radius the render surface draws.
pub const COVERAGE_RADIUS_METERS: f64 = 2_400_000.0;

/// Fixed future bias applied to recorded position timestamps so downstream
/// consumers never treat a just-computed sample as already stale.
pub const POSITION_LEAD_MS: i64 = 3_600;

/// On-orbit spares, excluded from default visibility and coverage unless the
/// display flag is enabled. Membership is fixed at startup.
pub const SPARE_SATELLITE_NUMBERS: &[&str] = &[
    "162", "161", "169", "170", "176", "124", "175", "115", "105", "178", "179", "177", "174",
];

pub fn is_spare(number: &str) -> bool {
    SPARE_SATELLITE_NUMBERS.contains(&number)
}

/// One tracked satellite.
///
/// Identity and element lines are fixed at parse time; the tracking fields
/// are absent until ticks populate them (`previous_*` stays `None` until a
/// second tick has run).
pub struct Satellite {
    pub number: String,
    pub name: String,
    pub line1: String,
    pub line2: String,
    pub state: OrbitalState,

    pub previous_position: Option<GeoPoint>,
    pub previous_timestamp: Option<i64>,
    pub current_position: Option<GeoPoint>,
    pub current_timestamp: Option<i64>,
    pub altitude_km: Option<f64>,
    pub speed_km_s: Option<f64>,
}

impl Satellite {
    pub fn new(
        number: String,
        name: String,
        line1: String,
        line2: String,
        state: OrbitalState,
    ) -> Self {
        Self {
            number,
            name,
            line1,
            line2,
            state,
            previous_position: None,
            previous_timestamp: None,
            current_position: None,
            current_timestamp: None,
            altitude_km: None,
            speed_km_s: None,
        }
    }

    pub fn is_spare(&self) -> bool {
        is_spare(&self.number)
    }
}

/// Read-only view of one satellite's latest tracked state, for info display.
#[derive(Debug, Clone)]
pub struct SatelliteSnapshot {
    pub number: String,
    pub name: String,
    pub position: GeoPoint,
    pub altitude_km: f64,
    pub speed_km_s: f64,
    pub is_spare: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spare_set_membership() {
        assert!(is_spare("162"));
        assert!(is_spare("105"));
        assert!(!is_spare("106"));
        assert!(!is_spare("Unknown"));
    }
}
