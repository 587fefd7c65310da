//! Session state and the per-tick recomputation.
//!
//! All mutable session state lives in one `SessionState` owned by the engine
//! behind an `RwLock`: a tick holds the write lock for its whole duration,
//! so a collection swap (refresh) or a location change is deferred until
//! between ticks and invariants hold at the start of every tick.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::geo::{wrap_to_center, GeoPoint};
use crate::orbit::{gmst, teme_to_geodetic};
use crate::store::{CacheStore, USER_LOCATION_KEY};
use crate::tle::{
    parse_element_sets, Acquired, CelestrakSource, RemoteSource, TleAcquirer, TleProvenance,
};

use super::coverage::{compute_coverage, CoverageResult};
use super::render::{MarkerUpdate, RenderSink};
use super::types::{Satellite, SatelliteSnapshot, POSITION_LEAD_MS};

/// Mutable per-session state. No ambient globals; everything the tick, the
/// coverage engine and the UI-facing operations touch is in here.
pub struct SessionState {
    pub satellites: Vec<Satellite>,
    /// Active ground location, raw unwrapped degrees. Persisted.
    pub ground_location: Option<GeoPoint>,
    /// Longitude of the current view center; every normalized longitude is
    /// within 180° of this.
    pub view_center_longitude: f64,
    pub show_spares: bool,
    /// Number of the single selected satellite, if any.
    pub selected: Option<String>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            satellites: Vec::new(),
            ground_location: None,
            view_center_longitude: 0.0,
            show_spares: false,
            selected: None,
        }
    }
}

pub struct TrackerEngine {
    state: Arc<RwLock<SessionState>>,
    acquirer: TleAcquirer,
    store: Arc<dyn CacheStore>,
    sink: Arc<dyn RenderSink>,
}

impl TrackerEngine {
    pub fn new(
        source: Arc<dyn RemoteSource>,
        store: Arc<dyn CacheStore>,
        sink: Arc<dyn RenderSink>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::new())),
            acquirer: TleAcquirer::new(source, store.clone()),
            store,
            sink,
        }
    }

    /// Builds an engine with a live Celestrak source per the configuration.
    pub fn from_config(
        config: &TrackerConfig,
        store: Arc<dyn CacheStore>,
        sink: Arc<dyn RenderSink>,
    ) -> Result<Self, TrackerError> {
        let source = CelestrakSource::new(
            config.tle_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self {
            state: Arc::new(RwLock::new(SessionState::new())),
            acquirer: TleAcquirer::with_max_age_hours(
                Arc::new(source),
                store.clone(),
                config.cache_max_age_hours,
            ),
            store,
            sink,
        })
    }

    /// Loads the element set and restores the persisted ground location.
    pub async fn initialize(&self) -> Result<usize, TrackerError> {
        info!("Initializing tracking engine...");
        if let Some(location) = self.load_saved_ground_location().await {
            info!(
                "Restored saved ground location ({:.4}, {:.4})",
                location.latitude, location.longitude
            );
            self.set_view_center(location.longitude).await;
        }
        let count = self.load().await?;
        info!("Tracking engine initialized with {} satellites", count);
        Ok(count)
    }

    /// Acquires, parses and swaps in a fresh satellite collection.
    ///
    /// Acquisition failure is terminal (`AcquisitionFailed`); an element set
    /// that parses to zero satellites is a valid, distinct outcome reported
    /// as `Ok(0)`.
    pub async fn load(&self) -> Result<usize, TrackerError> {
        let acquired = self.acquirer.acquire().await?;
        self.install(acquired).await
    }

    /// Full element-set refresh. Bypasses the fresh-cache tier so new data
    /// actually arrives; the new collection replaces the old one.
    pub async fn refresh(&self) -> Result<usize, TrackerError> {
        info!("Refreshing element sets");
        let acquired = self.acquirer.refresh().await?;
        self.install(acquired).await
    }

    async fn install(&self, acquired: Acquired) -> Result<usize, TrackerError> {
        if acquired.provenance == TleProvenance::StaleCache {
            warn!("Operating on stale element data");
        }

        let satellites = parse_element_sets(&acquired.text);
        if satellites.is_empty() {
            error!("No satellites were parsed; check the element data format");
        }
        let count = satellites.len();

        let mut state = self.state.write().await;
        // Full collection replacement. The selection survives only when the
        // same number exists in the new set.
        let selected = state
            .selected
            .take()
            .filter(|number| satellites.iter().any(|s| &s.number == number));
        state.satellites = satellites;
        state.selected = selected;
        info!("Loaded {} satellites", count);
        Ok(count)
    }

    pub async fn tick(&self) {
        self.tick_at(Utc::now()).await;
    }

    /// One recomputation pass over every satellite, at a given instant.
    ///
    /// Per-object propagation failures only skip that object for this tick;
    /// its stale position stays on display until a future tick succeeds.
    pub async fn tick_at(&self, instant: DateTime<Utc>) {
        let mut state = self.state.write().await;
        let now_ms = instant.timestamp_millis();
        let sidereal = gmst(instant);
        let center = state.view_center_longitude;

        for satellite in &mut state.satellites {
            satellite.previous_position = satellite.current_position;
            satellite.previous_timestamp = satellite.current_timestamp;

            let teme = match satellite.state.propagate_at(instant) {
                Ok(teme) => teme,
                Err(e) => {
                    debug!("{}", e);
                    continue;
                }
            };
            let geodetic = teme_to_geodetic(teme.position, sidereal);

            satellite.current_position = Some(GeoPoint::new(
                geodetic.latitude_deg,
                wrap_to_center(geodetic.longitude_deg, center),
            ));
            satellite.current_timestamp = Some(now_ms + POSITION_LEAD_MS);
            satellite.altitude_km = Some(geodetic.height_km);
            satellite.speed_km_s = Some(teme.speed());
        }

        let updates: Vec<MarkerUpdate> = state
            .satellites
            .iter()
            .filter_map(|satellite| {
                let position = satellite.current_position?;
                Some(MarkerUpdate {
                    number: satellite.number.clone(),
                    name: satellite.name.clone(),
                    position,
                    altitude_km: satellite.altitude_km.unwrap_or_default(),
                    speed_km_s: satellite.speed_km_s.unwrap_or_default(),
                    visible: !satellite.is_spare() || state.show_spares,
                    highlighted: state.selected.as_deref() == Some(satellite.number.as_str()),
                })
            })
            .collect();
        self.sink.markers_updated(&updates);

        if let Some(ground) = state.ground_location {
            let coverage =
                compute_coverage(ground, &state.satellites, center, state.show_spares);
            self.sink.coverage_updated(&coverage);
        }
    }

    /// Sets (and persists) the active ground location, then pushes an
    /// immediate coverage update.
    pub async fn set_ground_location(&self, location: GeoPoint) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.ground_location = Some(location);
        }
        self.store
            .set(USER_LOCATION_KEY, &serde_json::to_string(&location)?)
            .await?;

        if let Some(coverage) = self.coverage_now().await {
            self.sink.coverage_updated(&coverage);
        }
        Ok(())
    }

    pub async fn clear_ground_location(&self) -> Result<()> {
        self.state.write().await.ground_location = None;
        self.store.remove(USER_LOCATION_KEY).await
    }

    /// Restores a previously persisted ground location, if any.
    pub async fn load_saved_ground_location(&self) -> Option<GeoPoint> {
        let raw = self.store.get(USER_LOCATION_KEY).await?;
        match serde_json::from_str::<GeoPoint>(&raw) {
            Ok(location) => {
                self.state.write().await.ground_location = Some(location);
                Some(location)
            }
            Err(e) => {
                warn!("Ignoring unparseable saved ground location: {}", e);
                None
            }
        }
    }

    /// Computes coverage against the current state without waiting for the
    /// next tick. `None` when no ground location is active.
    pub async fn coverage_now(&self) -> Option<CoverageResult> {
        let state = self.state.read().await;
        let ground = state.ground_location?;
        Some(compute_coverage(
            ground,
            &state.satellites,
            state.view_center_longitude,
            state.show_spares,
        ))
    }

    /// Updates the reference longitude positions are normalized against.
    /// Takes effect on the next tick.
    pub async fn set_view_center(&self, longitude: f64) {
        self.state.write().await.view_center_longitude = longitude;
    }

    pub async fn set_show_spares(&self, show: bool) {
        self.state.write().await.show_spares = show;
    }

    /// Selects the satellite, or deselects it when already selected.
    /// Returns whether it is selected afterwards.
    pub async fn toggle_selection(&self, number: &str) -> bool {
        let mut state = self.state.write().await;
        if state.selected.as_deref() == Some(number) {
            state.selected = None;
            false
        } else {
            state.selected = Some(number.to_string());
            true
        }
    }

    pub async fn selected(&self) -> Option<String> {
        self.state.read().await.selected.clone()
    }

    pub async fn satellite_count(&self) -> usize {
        self.state.read().await.satellites.len()
    }

    /// Latest tracked state of one satellite, once a tick has positioned it.
    pub async fn snapshot(&self, number: &str) -> Option<SatelliteSnapshot> {
        let state = self.state.read().await;
        let satellite = state.satellites.iter().find(|s| s.number == number)?;
        Some(SatelliteSnapshot {
            number: satellite.number.clone(),
            name: satellite.name.clone(),
            position: satellite.current_position?,
            altitude_km: satellite.altitude_km?,
            speed_km_s: satellite.speed_km_s?,
            is_spare: satellite.is_spare(),
        })
    }

    /// Timestamps of the previous and current samples, for interpolation.
    pub async fn sample_timestamps(&self, number: &str) -> Option<(Option<i64>, Option<i64>)> {
        let state = self.state.read().await;
        let satellite = state.satellites.iter().find(|s| s.number == number)?;
        Some((satellite.previous_timestamp, satellite.current_timestamp))
    }
}
