//! The tracking engine: session state, the periodic recomputation loop,
//! coverage determination and the render boundary.

pub mod coverage;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod types;

pub use coverage::{compute_coverage, CoverageEntry, CoverageResult};
pub use render::{MarkerUpdate, NullSink, RenderSink};
pub use session::{SessionState, TrackerEngine};
pub use types::{
    is_spare, Satellite, SatelliteSnapshot, COVERAGE_RADIUS_METERS, POSITION_LEAD_MS,
    SPARE_SATELLITE_NUMBERS,
};
