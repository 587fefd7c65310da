use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::tle::TLE_ENDPOINT;

/// Engine configuration. Every field has a sensible default, so an empty
/// file (or `TrackerConfig::default()`) gives a working setup.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_tle_url")]
    pub tle_url: String,
    /// Cached element text older than this is refetched.
    #[serde(default = "default_cache_max_age_hours")]
    pub cache_max_age_hours: i64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_tle_url() -> String {
    TLE_ENDPOINT.to_string()
}

fn default_cache_max_age_hours() -> i64 {
    8
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_cache_dir() -> String {
    "cache".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tle_url: default_tle_url(),
            cache_max_age_hours: default_cache_max_age_hours(),
            tick_interval_ms: default_tick_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            cache_dir: default_cache_dir(),
            log_dir: default_log_dir(),
            log_level: default_log_level(),
        }
    }
}

impl TrackerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {:?}", path.as_ref()))?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_config_gets_all_defaults() {
        let config: TrackerConfig = toml::from_str("").unwrap();
        assert_eq!(config.tle_url, TLE_ENDPOINT);
        assert_eq!(config.cache_max_age_hours, 8);
        assert_eq!(config.tick_interval_ms, 1000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let config: TrackerConfig = toml::from_str(
            r#"
            tick_interval_ms = 250
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.cache_max_age_hours, 8);
    }

    #[test]
    fn config_loads_from_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tracker.toml");
        std::fs::write(&path, "cache_max_age_hours = 2\n").unwrap();

        let config = TrackerConfig::from_file(&path).unwrap();
        assert_eq!(config.cache_max_age_hours, 2);

        assert!(TrackerConfig::from_file(temp_dir.path().join("missing.toml")).is_err());
    }
}
