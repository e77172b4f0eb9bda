// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health        (cold + after refresh)
// - GET /api/data      (snapshot shape)
// - GET /              (rendered page)
// - reads during an in-flight cycle; no request-driven refresh route

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use common::{cache_with, CountingTokens, ScriptedContent};
use smartrz::{create_router, AppState, Category, SnapshotCache};

const BODY_LIMIT: usize = 1024 * 1024;

fn scripted_cache(delay: Duration) -> Arc<SnapshotCache> {
    let content = Arc::new(ScriptedContent::with_delay(delay));
    content.set_items(
        Category::Live,
        r#"[{"title":"Organic Chemistry","teacher":"Rolex Coderz Faculty","description":null,"link":"https://rolexcoderz.xyz/Player/?url=https://cdn/oc.m3u8"}]"#,
    );
    content.set_items(Category::Upcoming, r#"[{"name":"Vectors"},{"title":"Optics"}]"#);
    cache_with(Arc::new(CountingTokens::default()), content)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build GET");
    let resp = app.clone().oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    (status, String::from_utf8(bytes).expect("utf8"))
}

#[tokio::test]
async fn health_reports_null_last_updated_before_first_refresh() {
    let app = create_router(AppState::new(scripted_cache(Duration::ZERO)), None);

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_str(&body).expect("health json");
    assert_eq!(v["status"], "ok");
    assert!(v["lastUpdated"].is_null());
}

#[tokio::test]
async fn data_exposes_categories_and_timestamp_after_refresh() {
    let cache = scripted_cache(Duration::ZERO);
    cache.refresh().await;
    let app = create_router(AppState::new(cache), None);

    let (status, body) = get(&app, "/api/data").await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_str(&body).expect("data json");

    assert_eq!(v["live"].as_array().map(Vec::len), Some(1));
    assert_eq!(v["upcoming"].as_array().map(Vec::len), Some(2));
    assert_eq!(v["completed"].as_array().map(Vec::len), Some(0));
    assert!(v["lastUpdated"].is_string(), "lastUpdated must be RFC 3339");

    let live = &v["live"][0];
    assert_eq!(live["link"], "https://cdn/oc.m3u8");
    assert_eq!(live["teacher"], "smartrz Faculty");
    assert_eq!(live.get("description"), Some(&Json::Null));
    assert_eq!(v["upcoming"][0]["name"], "Vectors");

    let (_, health) = get(&app, "/health").await;
    let h: Json = serde_json::from_str(&health).unwrap();
    assert_eq!(h["lastUpdated"], v["lastUpdated"]);
}

#[tokio::test]
async fn index_renders_listing_page() {
    let cache = scripted_cache(Duration::ZERO);
    cache.refresh().await;
    let app = create_router(AppState::new(cache), None);

    let (status, html) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<h3>Organic Chemistry</h3>"));
    assert!(html.contains("<h3>Vectors</h3>"), "name falls back as title");
    assert!(html.contains("href=\"https://cdn/oc.m3u8\""));
    assert_eq!(html.matches("No classes found").count(), 1);
    assert!(!html.to_ascii_lowercase().contains("rolexcoderz"));
}

#[tokio::test]
async fn reads_are_served_while_a_cycle_runs() {
    let cache = scripted_cache(Duration::from_millis(200));
    let app = create_router(AppState::new(cache.clone()), None);

    let background = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Old snapshot keeps answering while the cycle is in flight.
    let (status, data) = get(&app, "/api/data").await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_str(&data).unwrap();
    assert!(v["lastUpdated"].is_null());

    background.await.unwrap();
    assert!(cache.last_updated_at().is_some());
}

#[tokio::test]
async fn requests_cannot_trigger_a_refresh() {
    let cache = scripted_cache(Duration::ZERO);
    let app = create_router(AppState::new(cache.clone()), None);

    let (status, _) = get(&app, "/admin/refresh").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    for uri in ["/", "/api/data", "/health"] {
        get(&app, uri).await;
    }
    assert!(cache.last_updated_at().is_none());
}
