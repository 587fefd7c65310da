//! Tracking engine for the Iridium NEXT constellation.
//!
//! Acquires three-line element sets (with a cache-first, degrade-to-stale
//! policy), propagates every satellite on a periodic tick, normalizes the
//! resulting longitudes for a seamless horizontally-wrapping map, determines
//! which satellites cover a ground location, and pushes render intents
//! through the [`engine::RenderSink`] boundary. The embedding application
//! supplies the sink and a [`store::CacheStore`]; everything else is here.

pub mod config;
pub mod engine;
pub mod error;
pub mod geo;
pub mod logging;
pub mod orbit;
pub mod store;
pub mod tle;

#[cfg(test)]
mod testutil;

pub use config::TrackerConfig;
pub use engine::{
    CoverageResult, MarkerUpdate, NullSink, RenderSink, SatelliteSnapshot, TrackerEngine,
};
pub use error::TrackerError;
pub use geo::GeoPoint;
pub use store::{CacheStore, FileStore, MemoryStore};
pub use tle::{RemoteSource, TleProvenance};
