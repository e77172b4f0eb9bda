// src/ingest/mod.rs
pub mod config;
pub mod decode;
pub mod error;
pub mod providers;
pub mod sanitize;
pub mod scheduler;
pub mod token;
pub mod types;

use anyhow::{anyhow, Context, Result};
use metrics::counter;
use std::sync::Arc;

use crate::ingest::config::{FetcherKind, UpstreamConfig};
use crate::ingest::error::IngestError;
use crate::ingest::providers::{
    command::CommandContentFetcher,
    http::{upstream_client, HttpContentFetcher},
};
use crate::ingest::token::HttpTokenProvider;
use crate::ingest::types::{Category, ContentSource, CredentialSource, ListingItem};

/// Outcome of one category within a refresh cycle.
#[derive(Debug)]
pub struct CategoryOutcome {
    pub category: Category,
    pub items: Vec<ListingItem>,
    pub error: Option<IngestError>,
}

impl CategoryOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// authenticate → fetch → decode → sanitize, one category at a time.
#[derive(Clone)]
pub struct Pipeline {
    credentials: Arc<dyn CredentialSource>,
    content: Arc<dyn ContentSource>,
}

impl Pipeline {
    pub fn new(credentials: Arc<dyn CredentialSource>, content: Arc<dyn ContentSource>) -> Self {
        Self {
            credentials,
            content,
        }
    }

    /// Wire the production sources from config.
    pub fn from_config(cfg: &UpstreamConfig) -> Result<Self> {
        let client = upstream_client(cfg).context("building upstream http client")?;
        let credentials = Arc::new(HttpTokenProvider::new(client.clone(), cfg));
        let content: Arc<dyn ContentSource> = match cfg.fetcher {
            FetcherKind::Http => Arc::new(HttpContentFetcher::new(client, cfg)),
            FetcherKind::Command => Arc::new(
                CommandContentFetcher::new(&cfg.command, cfg.request_timeout())
                    .ok_or_else(|| anyhow!("fetcher = \"command\" requires a non-empty `command`"))?,
            ),
        };
        Ok(Self::new(credentials, content))
    }

    /// Fallible pipeline for one category. Each call acquires its own credential.
    pub async fn fetch_listing(&self, category: Category) -> Result<Vec<ListingItem>, IngestError> {
        let credential = self.credentials.acquire_credential().await?;
        let envelope = self.content.fetch_category(category, &credential).await?;
        let raw = decode::decode(&envelope)?;
        let decoded = raw.len();
        let items = sanitize::sanitize(raw)?;
        tracing::debug!(
            target: "ingest",
            category = %category,
            decoded,
            kept = items.len(),
            "category decoded"
        );
        Ok(items)
    }

    /// Category boundary: any failure becomes an empty listing plus a diagnostic.
    pub async fn run_category(&self, category: Category) -> CategoryOutcome {
        match self.fetch_listing(category).await {
            Ok(items) => CategoryOutcome {
                category,
                items,
                error: None,
            },
            Err(e) => {
                let stage = e.stage().as_str();
                tracing::warn!(
                    target: "ingest",
                    category = %category,
                    stage,
                    source = self.content.name(),
                    error = %e,
                    "category pipeline failed; using empty listing"
                );
                counter!(
                    "refresh_category_failures_total",
                    "category" => category.as_str(),
                    "stage" => stage
                )
                .increment(1);
                CategoryOutcome {
                    category,
                    items: Vec::new(),
                    error: Some(e),
                }
            }
        }
    }

    /// Run all three categories concurrently; returns once every one has finished.
    pub async fn run_all(&self) -> [CategoryOutcome; 3] {
        let (live, upcoming, completed) = tokio::join!(
            self.run_category(Category::Live),
            self.run_category(Category::Upcoming),
            self.run_category(Category::Completed),
        );
        [live, upcoming, completed]
    }
}
