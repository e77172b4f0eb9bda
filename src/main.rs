//! Class listing mirror — Binary Entrypoint
//! Boots the Axum HTTP server, starts the refresh scheduler, and wires shared state.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use smartrz::ingest::scheduler::spawn_refresh_scheduler;
use smartrz::metrics::Metrics;
use smartrz::{build_cache, create_router, AppState, UpstreamConfig};

/// Compact tracing logs; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("smartrz=info,ingest=info,warn"));

    // Shuttle may already have installed a subscriber; that's fine.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = UpstreamConfig::load_default()?;
    tracing::info!(
        token_url = %cfg.token_url,
        content_url = %cfg.content_url,
        fetcher = ?cfg.fetcher,
        interval_secs = cfg.refresh_interval_secs,
        "upstream config loaded"
    );

    let metrics = match Metrics::install(cfg.refresh_interval_secs) {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::warn!(error = ?e, "metrics disabled");
            None
        }
    };

    let cache = build_cache(&cfg)?;
    spawn_refresh_scheduler(cache.clone(), cfg.refresh_interval());

    let router = create_router(AppState::new(cache), metrics.as_ref());
    Ok(router.into())
}
