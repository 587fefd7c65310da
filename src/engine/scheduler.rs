//! Self-rescheduling tick loop.
//!
//! The next run is scheduled only after the current one completes, so a slow
//! pass stretches the effective period instead of stacking concurrent runs.
//! Wall-clock alignment drifts accordingly; each tick recomputes from the
//! current instant, so nothing downstream depends on alignment.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

use super::session::TrackerEngine;

/// Runs `task` forever, sleeping `interval` after each completion.
pub async fn run_periodic<F, Fut>(interval: Duration, mut task: F)
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = ()> + Send,
{
    loop {
        task().await;
        tokio::time::sleep(interval).await;
    }
}

/// Spawns the engine's recomputation loop. Drop or abort the handle to stop
/// ticking.
pub fn start(engine: Arc<TrackerEngine>, interval: Duration) -> JoinHandle<()> {
    info!("Starting position updates every {:?}", interval);
    tokio::spawn(async move {
        run_periodic(interval, || {
            let engine = engine.clone();
            async move {
                engine.tick().await;
            }
        })
        .await;
    })
}
