//! Boundary to the external render surface.
//!
//! The engine pushes normalized positions and coverage sets; how markers,
//! circles and lines get drawn is entirely the sink's business. Per object
//! per tick the sink receives a stable identifier, a normalized lat/lng pair
//! and the visibility/highlight intents.

use crate::geo::GeoPoint;

use super::coverage::CoverageResult;

/// Per-satellite render intent for one tick.
#[derive(Debug, Clone)]
pub struct MarkerUpdate {
    pub number: String,
    pub name: String,
    pub position: GeoPoint,
    pub altitude_km: f64,
    pub speed_km_s: f64,
    /// False when the satellite is a spare and spares are hidden.
    pub visible: bool,
    /// True for the single selected satellite, if any.
    pub highlighted: bool,
}

pub trait RenderSink: Send + Sync {
    fn markers_updated(&self, updates: &[MarkerUpdate]);
    fn coverage_updated(&self, coverage: &CoverageResult);
}

/// Sink for embeddings that drive rendering elsewhere (or not at all).
pub struct NullSink;

impl RenderSink for NullSink {
    fn markers_updated(&self, _updates: &[MarkerUpdate]) {}
    fn coverage_updated(&self, _coverage: &CoverageResult) {}
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use std::sync::Mutex;

    /// Test sink that records everything pushed to it.
    #[derive(Default)]
    pub struct RecordingSink {
        pub marker_batches: Mutex<Vec<Vec<MarkerUpdate>>>,
        pub coverage_numbers: Mutex<Vec<Vec<String>>>,
    }

    impl RenderSink for RecordingSink {
        fn markers_updated(&self, updates: &[MarkerUpdate]) {
            self.marker_batches.lock().unwrap().push(updates.to_vec());
        }

        fn coverage_updated(&self, coverage: &CoverageResult) {
            let numbers = coverage.iter().map(|e| e.number.clone()).collect();
            self.coverage_numbers.lock().unwrap().push(numbers);
        }
    }
}
