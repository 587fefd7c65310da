//! Coverage determination: which satellites currently serve a ground point.

use std::collections::HashMap;

use crate::geo::{haversine_distance, wrap_to_center, GeoPoint};

use super::types::{Satellite, COVERAGE_RADIUS_METERS};

/// One covering satellite with its ground-projected position.
#[derive(Debug, Clone)]
pub struct CoverageEntry {
    pub number: String,
    pub name: String,
    pub position: GeoPoint,
}

/// Covering satellites keyed by identity, in first-encounter order.
///
/// A later entry for an already-present number overwrites the earlier one in
/// place, so each identifier contributes exactly once however many scan
/// passes fed it. Downstream draws one connecting edge per entry.
#[derive(Debug)]
pub struct CoverageResult {
    /// Ground location, longitude already normalized to the view center.
    pub ground: GeoPoint,
    entries: Vec<CoverageEntry>,
    index: HashMap<String, usize>,
}

impl CoverageResult {
    fn new(ground: GeoPoint) -> Self {
        Self {
            ground,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn insert(&mut self, entry: CoverageEntry) {
        match self.index.get(&entry.number) {
            Some(&at) => self.entries[at] = entry,
            None => {
                self.index.insert(entry.number.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, number: &str) -> bool {
        self.index.contains_key(number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoverageEntry> {
        self.entries.iter()
    }
}

/// Scans the collection for satellites within the coverage radius of the
/// ground location. Spares are skipped unless `include_spares`; the ground
/// longitude is normalized against the same view center the satellite
/// positions were, so the distance never crosses the map seam spuriously.
pub fn compute_coverage(
    ground: GeoPoint,
    satellites: &[Satellite],
    center_longitude: f64,
    include_spares: bool,
) -> CoverageResult {
    let ground = GeoPoint::new(
        ground.latitude,
        wrap_to_center(ground.longitude, center_longitude),
    );
    let mut result = CoverageResult::new(ground);

    for satellite in satellites {
        if satellite.is_spare() && !include_spares {
            continue;
        }
        let Some(position) = satellite.current_position else {
            continue;
        };
        if haversine_distance(ground, position) <= COVERAGE_RADIUS_METERS {
            result.insert(CoverageEntry {
                number: satellite.number.clone(),
                name: satellite.name.clone(),
                position,
            });
        }
    }

    result
}
