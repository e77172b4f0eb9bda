//! # Snapshot Cache
//! Holds the latest listing for every category plus a freshness timestamp.
//!
//! Readers clone an `Arc<Snapshot>` under a read lock and never wait on a
//! refresh: the write lock is held only for the pointer swap at the end of
//! a cycle. A `tokio::sync::Mutex` used with `try_lock` keeps refreshes
//! single-flight; an overlapping trigger is skipped, not queued.

use chrono::{DateTime, Utc};
use metrics::{counter, gauge, histogram};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use crate::ingest::types::{Category, ListingItem};
use crate::ingest::{CategoryOutcome, Pipeline};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub live: Vec<ListingItem>,
    pub upcoming: Vec<ListingItem>,
    pub completed: Vec<ListingItem>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn category(&self, category: Category) -> &[ListingItem] {
        match category {
            Category::Live => &self.live,
            Category::Upcoming => &self.upcoming,
            Category::Completed => &self.completed,
        }
    }

    /// Assemble the next snapshot from a finished cycle. The timestamp only
    /// advances when at least one category succeeded; a wholly failed cycle
    /// leaves empty listings under the previous timestamp.
    fn from_cycle(
        outcomes: [CategoryOutcome; 3],
        previous: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        let any_ok = outcomes.iter().any(CategoryOutcome::succeeded);
        let mut next = Snapshot {
            last_updated: if any_ok { Some(now) } else { previous },
            ..Default::default()
        };
        for o in outcomes {
            match o.category {
                Category::Live => next.live = o.items,
                Category::Upcoming => next.upcoming = o.items,
                Category::Completed => next.completed = o.items,
            }
        }
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Full cycle ran and the snapshot was swapped.
    Completed { succeeded: usize, failed: usize },
    /// Another refresh was already running.
    Skipped,
}

pub struct SnapshotCache {
    current: RwLock<Arc<Snapshot>>,
    refresh_guard: tokio::sync::Mutex<()>,
    pipeline: Pipeline,
}

impl SnapshotCache {
    /// Starts empty; the first refresh populates it.
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::default())),
            refresh_guard: tokio::sync::Mutex::new(()),
            pipeline,
        }
    }

    pub fn current_snapshot(&self) -> Arc<Snapshot> {
        match self.current.read() {
            Ok(g) => Arc::clone(&g),
            Err(poison) => Arc::clone(&poison.into_inner()),
        }
    }

    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.current_snapshot().last_updated
    }

    /// Run one refresh cycle. Never fails: stage errors were already
    /// downgraded to empty categories by the pipeline.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Ok(_guard) = self.refresh_guard.try_lock() else {
            tracing::info!(target: "ingest", "refresh already in progress; skipping trigger");
            counter!("refresh_skipped_total").increment(1);
            return RefreshOutcome::Skipped;
        };

        let t0 = Instant::now();
        let outcomes = self.pipeline.run_all().await;
        let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
        let succeeded = outcomes.len() - failed;

        let previous = self.last_updated_at();
        let next = Arc::new(Snapshot::from_cycle(outcomes, previous, Utc::now()));
        self.swap(Arc::clone(&next));

        counter!("refresh_cycles_total").increment(1);
        histogram!("refresh_cycle_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        for c in Category::ALL {
            gauge!("listing_items", "category" => c.as_str()).set(next.category(c).len() as f64);
        }
        if let Some(ts) = next.last_updated {
            gauge!("refresh_last_success_ts").set(ts.timestamp() as f64);
        }

        tracing::info!(
            target: "ingest",
            live = next.live.len(),
            upcoming = next.upcoming.len(),
            completed = next.completed.len(),
            failed,
            "refresh cycle complete"
        );

        RefreshOutcome::Completed { succeeded, failed }
    }

    fn swap(&self, next: Arc<Snapshot>) {
        match self.current.write() {
            Ok(mut g) => *g = next,
            Err(poison) => *poison.into_inner() = next,
        }
    }
}
