//! Element-set acquisition and parsing.

mod fetch;
mod parse;

pub use fetch::{Acquired, CelestrakSource, RemoteSource, TleAcquirer, TleProvenance, TLE_ENDPOINT};
pub use parse::{parse_element_sets, UNKNOWN_NUMBER};
