use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and describe the refresh series.
    /// Fails if a recorder is already installed in this process.
    pub fn install(refresh_interval_secs: u64) -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!("refresh_cycles_total", "Completed refresh cycles.");
        describe_counter!(
            "refresh_skipped_total",
            "Refresh triggers dropped because a cycle was already running."
        );
        describe_counter!(
            "refresh_category_failures_total",
            "Per-category pipeline failures, labelled by category and stage."
        );
        describe_gauge!("listing_items", "Items currently cached per category.");
        describe_gauge!(
            "refresh_last_success_ts",
            "Unix ts of the last cycle with at least one successful category."
        );
        describe_gauge!("refresh_interval_secs", "Configured refresh interval.");
        describe_histogram!("refresh_cycle_ms", "Refresh cycle duration in milliseconds.");

        gauge!("refresh_interval_secs").set(refresh_interval_secs as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
