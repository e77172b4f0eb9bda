// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod cache;
pub mod ingest;
pub mod metrics;
pub mod render;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::cache::{RefreshOutcome, Snapshot, SnapshotCache};
pub use crate::ingest::config::UpstreamConfig;
pub use crate::ingest::types::{Category, ListingItem};
pub use crate::ingest::Pipeline;

use std::sync::Arc;

/// Build the cache from config without starting the scheduler.
pub fn build_cache(cfg: &UpstreamConfig) -> anyhow::Result<Arc<SnapshotCache>> {
    let pipeline = Pipeline::from_config(cfg)?;
    Ok(Arc::new(SnapshotCache::new(pipeline)))
}
