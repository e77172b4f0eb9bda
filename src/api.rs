use std::sync::Arc;

use axum::{
    extract::State,
    response::Html,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;

use crate::cache::{Snapshot, SnapshotCache};
use crate::metrics::Metrics;
use crate::render::render_page;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<SnapshotCache>,
}

impl AppState {
    pub fn new(cache: Arc<SnapshotCache>) -> Self {
        Self { cache }
    }
}

/// Read-only routes over the snapshot cache. Pass `metrics` to also mount `/metrics`.
pub fn create_router(state: AppState, metrics: Option<&Metrics>) -> Router {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/api/data", get(data))
        .route("/health", get(health));
    if let Some(m) = metrics {
        router = router.merge(m.router());
    }
    router.layer(CorsLayer::very_permissive()).with_state(state)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let snap = state.cache.current_snapshot();
    Html(render_page(&snap))
}

async fn data(State(state): State<AppState>) -> Json<Snapshot> {
    Json(Snapshot::clone(&state.cache.current_snapshot()))
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthOut {
    status: &'static str,
    last_updated: Option<DateTime<Utc>>,
}

async fn health(State(state): State<AppState>) -> Json<HealthOut> {
    Json(HealthOut {
        status: "ok",
        last_updated: state.cache.last_updated_at(),
    })
}
