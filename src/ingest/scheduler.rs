// src/ingest/scheduler.rs
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::cache::{RefreshOutcome, SnapshotCache};

/// Spawn the periodic refresh loop. The first tick fires immediately, which
/// doubles as the eager startup refresh; late ticks are skipped rather than
/// bunched up, and the cache's single-flight guard drops any overlap.
pub fn spawn_refresh_scheduler(cache: Arc<SnapshotCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match cache.refresh().await {
                RefreshOutcome::Completed { succeeded, failed } => tracing::debug!(
                    target: "ingest",
                    succeeded,
                    failed,
                    "scheduled refresh tick"
                ),
                RefreshOutcome::Skipped => tracing::debug!(
                    target: "ingest",
                    "scheduled refresh skipped"
                ),
            }
        }
    })
}
