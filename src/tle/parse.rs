//! Parses raw three-line element text into typed satellite records.

use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, error};

use crate::engine::types::Satellite;
use crate::orbit::OrbitalState;

/// Identifier used when the name line carries no recognizable number.
pub const UNKNOWN_NUMBER: &str = "Unknown";

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)IRIDIUM\s+(\d+)").expect("valid pattern"))
}

/// Extracts the satellite number from a name line and canonicalizes the
/// display name to `Iridium <n>`. Without a recognizable suffix the number is
/// `"Unknown"` and the name stays the raw (trimmed) line.
fn identify(name_line: &str) -> (String, String) {
    match number_pattern()
        .captures(name_line)
        .and_then(|c| c.get(1))
    {
        Some(number) => {
            let number = number.as_str().to_string();
            let name = format!("Iridium {number}");
            (number, name)
        }
        None => (UNKNOWN_NUMBER.to_string(), name_line.to_string()),
    }
}

/// Parses element text: non-blank lines grouped in threes (name line, two
/// element lines), in input order.
///
/// A trailing incomplete group is skipped; lines the propagation library
/// rejects drop that one object with an error log. Neither aborts the rest
/// of the parse. An empty result is valid; the caller distinguishes it from
/// acquisition failure.
pub fn parse_element_sets(raw: &str) -> Vec<Satellite> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut satellites = Vec::new();
    for group in lines.chunks(3) {
        let [name_line, line1, line2] = group else {
            debug!("Skipping incomplete element group of {} line(s)", group.len());
            continue;
        };

        let (number, name) = identify(name_line);
        match OrbitalState::from_tle(&name, line1, line2) {
            Ok(state) => satellites.push(Satellite::new(
                number,
                name,
                line1.to_string(),
                line2.to_string(),
                state,
            )),
            Err(e) => error!("Dropping '{}': {}", name, e),
        }
    }

    satellites
}
