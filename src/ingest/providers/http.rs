// src/ingest/providers/http.rs
use async_trait::async_trait;
use reqwest::header::{ACCEPT, REFERER, USER_AGENT};
use reqwest::Client;
use serde_json::{json, Value};

use crate::ingest::config::UpstreamConfig;
use crate::ingest::error::FetchError;
use crate::ingest::types::{Category, ContentSource, Credential, RawEnvelope};

pub const HEADER_TIMESTAMP: &str = "x-timestamp";
pub const HEADER_SIGNATURE: &str = "x-signature";

/// Shared client for both upstream endpoints. gzip/deflate/brotli are
/// negotiated and decoded transparently; every request is bounded by the
/// configured timeout.
pub fn upstream_client(cfg: &UpstreamConfig) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(cfg.request_timeout())
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .build()
}

/// POSTs `{"type": <category>}` to the content endpoint with the credential
/// attached as `x-timestamp` / `x-signature`.
#[derive(Clone)]
pub struct HttpContentFetcher {
    client: Client,
    url: String,
    user_agent: String,
    referer: String,
}

impl HttpContentFetcher {
    pub fn new(client: Client, cfg: &UpstreamConfig) -> Self {
        Self {
            client,
            url: cfg.content_url.clone(),
            user_agent: cfg.user_agent.clone(),
            referer: cfg.referer.clone(),
        }
    }
}

#[async_trait]
impl ContentSource for HttpContentFetcher {
    async fn fetch_category(
        &self,
        category: Category,
        credential: &Credential,
    ) -> Result<RawEnvelope, FetchError> {
        let resp = self
            .client
            .post(&self.url)
            .header(HEADER_TIMESTAMP, credential.issued_timestamp.to_string())
            .header(HEADER_SIGNATURE, &credential.signature)
            .header(USER_AGENT, &self.user_agent)
            .header(REFERER, &self.referer)
            .header(ACCEPT, "*/*")
            .json(&json!({ "type": category.wire_name() }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(
                target: "ingest",
                category = %category,
                status = status.as_u16(),
                "content endpoint returned non-success"
            );
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let json: Value = serde_json::from_str(&body)?;
        RawEnvelope::from_body(json)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
