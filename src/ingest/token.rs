// src/ingest/token.rs
use async_trait::async_trait;
use reqwest::header::{REFERER, USER_AGENT};
use reqwest::Client;
use serde_json::Value;

use crate::ingest::config::UpstreamConfig;
use crate::ingest::error::AuthError;
use crate::ingest::types::{Credential, CredentialSource};

/// Fetches a fresh timestamp/signature pair from the auth endpoint.
/// Stateless: nothing is cached between calls.
#[derive(Clone)]
pub struct HttpTokenProvider {
    client: Client,
    url: String,
    user_agent: String,
    referer: String,
}

impl HttpTokenProvider {
    pub fn new(client: Client, cfg: &UpstreamConfig) -> Self {
        Self {
            client,
            url: cfg.token_url.clone(),
            user_agent: cfg.user_agent.clone(),
            referer: cfg.referer.clone(),
        }
    }
}

#[async_trait]
impl CredentialSource for HttpTokenProvider {
    async fn acquire_credential(&self) -> Result<Credential, AuthError> {
        let resp = self
            .client
            .get(&self.url)
            .header(USER_AGENT, &self.user_agent)
            .header(REFERER, &self.referer)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let json: Value = serde_json::from_str(&body)?;
        let cred = Credential::from_auth_body(&json)?;
        tracing::debug!(
            target: "ingest",
            issued = cred.issued_timestamp,
            "credential acquired"
        );
        Ok(cred)
    }
}
