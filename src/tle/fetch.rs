//! Element-set acquisition with a three-tier degrade-gracefully policy.
//!
//! fresh cache → live fetch → stale cache → hard failure. Tiers 1 and 3
//! trigger on different conditions (staleness vs. fetch error) but share the
//! fallback action, so the tiers are spelled out explicitly rather than as a
//! single try/catch.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::TrackerError;
use crate::store::{CacheStore, TLE_FETCHED_AT_KEY, TLE_TEXT_KEY};

/// Celestrak GP endpoint for the Iridium NEXT group, three-line format.
pub const TLE_ENDPOINT: &str =
    "https://celestrak.org/NORAD/elements/gp.php?GROUP=iridium-NEXT&FORMAT=tle";

const DEFAULT_MAX_AGE_HOURS: i64 = 8;

#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch(&self) -> Result<String, TrackerError>;
}

/// Live HTTP source against a fixed well-known endpoint.
pub struct CelestrakSource {
    client: reqwest::Client,
    url: String,
}

impl CelestrakSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TrackerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RemoteSource for CelestrakSource {
    async fn fetch(&self) -> Result<String, TrackerError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(TrackerError::Fetch(format!(
                "HTTP {} from {}",
                response.status(),
                self.url
            )));
        }
        Ok(response.text().await?)
    }
}

/// Which tier produced the text. `StaleCache` is the degraded-but-usable
/// outcome the embedding application may want to surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TleProvenance {
    FreshCache,
    Network,
    StaleCache,
}

#[derive(Debug)]
pub struct Acquired {
    pub text: String,
    pub provenance: TleProvenance,
}

pub struct TleAcquirer {
    source: Arc<dyn RemoteSource>,
    store: Arc<dyn CacheStore>,
    max_age_ms: i64,
}

impl TleAcquirer {
    pub fn new(source: Arc<dyn RemoteSource>, store: Arc<dyn CacheStore>) -> Self {
        Self::with_max_age_hours(source, store, DEFAULT_MAX_AGE_HOURS)
    }

    pub fn with_max_age_hours(
        source: Arc<dyn RemoteSource>,
        store: Arc<dyn CacheStore>,
        max_age_hours: i64,
    ) -> Self {
        Self {
            source,
            store,
            max_age_ms: max_age_hours * 60 * 60 * 1000,
        }
    }

    pub async fn acquire(&self) -> Result<Acquired, TrackerError> {
        self.acquire_inner(false).await
    }

    /// Like [`acquire`](Self::acquire) but skips the fresh-cache tier, so a
    /// deliberate refresh always reaches the network for new data. A failed
    /// fetch still falls back to any cached copy.
    pub async fn refresh(&self) -> Result<Acquired, TrackerError> {
        self.acquire_inner(true).await
    }

    async fn acquire_inner(&self, force_fetch: bool) -> Result<Acquired, TrackerError> {
        let now_ms = Utc::now().timestamp_millis();

        // Tier 1: fresh cache, no network access at all.
        let cached = self.store.get(TLE_TEXT_KEY).await;
        if let Some(text) = &cached {
            if !force_fetch {
                let fetched_at = self
                    .store
                    .get(TLE_FETCHED_AT_KEY)
                    .await
                    .and_then(|v| v.parse::<i64>().ok());
                if let Some(fetched_at) = fetched_at {
                    if now_ms - fetched_at < self.max_age_ms {
                        debug!("Loaded element set from cache (age {} ms)", now_ms - fetched_at);
                        return Ok(Acquired {
                            text: text.clone(),
                            provenance: TleProvenance::FreshCache,
                        });
                    }
                }
            }
        }

        // Tier 2: live fetch, overwriting the cache entry on success. Text
        // in hand beats a broken cache; a failed write is only a warning.
        match self.source.fetch().await {
            Ok(text) => {
                if let Err(e) = self.store.set(TLE_TEXT_KEY, &text).await {
                    warn!("Failed to cache element text: {}", e);
                } else if let Err(e) = self.store.set(TLE_FETCHED_AT_KEY, &now_ms.to_string()).await
                {
                    warn!("Failed to record the element fetch time: {}", e);
                }
                info!("Fetched new element set ({} bytes)", text.len());
                Ok(Acquired {
                    text,
                    provenance: TleProvenance::Network,
                })
            }
            Err(e) => {
                // Tier 3: any cached copy, regardless of freshness.
                if let Some(text) = cached {
                    warn!("Element set fetch failed, using possibly stale cache: {}", e);
                    return Ok(Acquired {
                        text,
                        provenance: TleProvenance::StaleCache,
                    });
                }
                error!("Element set fetch failed and no cache available: {}", e);
                Err(TrackerError::AcquisitionFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        response: Result<String, ()>,
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn ok(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err(()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RemoteSource for CountingSource {
        async fn fetch(&self) -> Result<String, TrackerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .map_err(|_| TrackerError::Fetch("connection refused".into()))
        }
    }

    async fn seed_cache(store: &MemoryStore, text: &str, age_hours: i64) {
        let fetched_at = Utc::now().timestamp_millis() - age_hours * 60 * 60 * 1000;
        store.set(TLE_TEXT_KEY, text).await.unwrap();
        store
            .set(TLE_FETCHED_AT_KEY, &fetched_at.to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn fresh_cache_short_circuits_without_fetching() {
        let store = Arc::new(MemoryStore::new());
        seed_cache(&store, "cached text", 7).await;

        let source = Arc::new(CountingSource::ok("network text"));
        let acquirer = TleAcquirer::new(source.clone(), store);

        let acquired = acquirer.acquire().await.unwrap();
        assert_eq!(acquired.text, "cached text");
        assert_eq!(acquired.provenance, TleProvenance::FreshCache);
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn stale_cache_triggers_fetch_and_overwrite() {
        let store = Arc::new(MemoryStore::new());
        seed_cache(&store, "stale text", 9).await;

        let source = Arc::new(CountingSource::ok("network text"));
        let acquirer = TleAcquirer::new(source.clone(), store.clone());

        let acquired = acquirer.acquire().await.unwrap();
        assert_eq!(acquired.text, "network text");
        assert_eq!(acquired.provenance, TleProvenance::Network);
        assert_eq!(source.call_count(), 1);
        assert_eq!(store.get(TLE_TEXT_KEY).await.as_deref(), Some("network text"));
    }

    #[tokio::test]
    async fn failed_fetch_falls_back_to_stale_cache() {
        let store = Arc::new(MemoryStore::new());
        seed_cache(&store, "stale text", 9).await;

        let acquirer = TleAcquirer::new(Arc::new(CountingSource::failing()), store);

        let acquired = acquirer.acquire().await.unwrap();
        assert_eq!(acquired.text, "stale text");
        assert_eq!(acquired.provenance, TleProvenance::StaleCache);
    }

    #[tokio::test]
    async fn failed_fetch_without_cache_is_terminal() {
        let store = Arc::new(MemoryStore::new());
        let acquirer = TleAcquirer::new(Arc::new(CountingSource::failing()), store);

        let err = acquirer.acquire().await.unwrap_err();
        assert!(matches!(err, TrackerError::AcquisitionFailed));
    }

    struct RejectingStore;

    #[async_trait]
    impl CacheStore for RejectingStore {
        async fn get(&self, _key: &str) -> Option<String> {
            None
        }

        async fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk full"))
        }

        async fn remove(&self, _key: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn refresh_bypasses_the_fresh_cache() {
        let store = Arc::new(MemoryStore::new());
        seed_cache(&store, "cached text", 1).await;

        let source = Arc::new(CountingSource::ok("network text"));
        let acquirer = TleAcquirer::new(source.clone(), store.clone());

        let acquired = acquirer.refresh().await.unwrap();
        assert_eq!(acquired.text, "network text");
        assert_eq!(acquired.provenance, TleProvenance::Network);
        assert_eq!(source.call_count(), 1);
        assert_eq!(store.get(TLE_TEXT_KEY).await.as_deref(), Some("network text"));
    }

    #[tokio::test]
    async fn failed_refresh_falls_back_to_the_cache() {
        let store = Arc::new(MemoryStore::new());
        seed_cache(&store, "cached text", 1).await;

        let acquirer = TleAcquirer::new(Arc::new(CountingSource::failing()), store);

        let acquired = acquirer.refresh().await.unwrap();
        assert_eq!(acquired.text, "cached text");
        assert_eq!(acquired.provenance, TleProvenance::StaleCache);
    }

    #[tokio::test]
    async fn cache_write_failure_does_not_discard_fetched_text() {
        let source = Arc::new(CountingSource::ok("network text"));
        let acquirer = TleAcquirer::new(source, Arc::new(RejectingStore));

        let acquired = acquirer.acquire().await.unwrap();
        assert_eq!(acquired.text, "network text");
        assert_eq!(acquired.provenance, TleProvenance::Network);
    }

    #[tokio::test]
    #[ignore] // hits the live endpoint
    async fn live_endpoint_returns_three_line_text() {
        let source = CelestrakSource::new(TLE_ENDPOINT, Duration::from_secs(30)).unwrap();
        let text = source.fetch().await.unwrap();
        assert!(text.lines().count() >= 3);
    }

    #[tokio::test]
    async fn missing_timestamp_is_treated_as_stale() {
        let store = Arc::new(MemoryStore::new());
        store.set(TLE_TEXT_KEY, "orphan text").await.unwrap();

        let source = Arc::new(CountingSource::ok("network text"));
        let acquirer = TleAcquirer::new(source.clone(), store);

        let acquired = acquirer.acquire().await.unwrap();
        assert_eq!(acquired.provenance, TleProvenance::Network);
        assert_eq!(source.call_count(), 1);
    }
}
