//! Shared fixtures for the test suite.

/// A real element set with valid checksums (ISS, mid-2020). The orbital
/// numbers are what matter; name lines vary per test.
pub const TLE_LINE1: &str =
    "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
pub const TLE_LINE2: &str =
    "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

/// Element text in the three-line wire format with one valid group.
pub fn tle_text(name_line: &str) -> String {
    format!("{name_line}\n{TLE_LINE1}\n{TLE_LINE2}\n")
}
