// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_CONFIG_PATH: &str = "UPSTREAM_CONFIG_PATH";
pub const ENV_TOKEN_URL: &str = "UPSTREAM_TOKEN_URL";
pub const ENV_CONTENT_URL: &str = "UPSTREAM_CONTENT_URL";
pub const ENV_REFRESH_INTERVAL: &str = "REFRESH_INTERVAL_SECS";

pub const DEFAULT_TOKEN_URL: &str = "https://rolexcoderz.in/api/get-token";
pub const DEFAULT_CONTENT_URL: &str = "https://rolexcoderz.in/api/get-live-classes";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Mobile Safari/537.36";
pub const DEFAULT_REFERER: &str = "https://rolexcoderz.in/live-classes";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_REFRESH_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetcherKind {
    #[default]
    Http,
    Command,
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}
fn default_content_url() -> String {
    DEFAULT_CONTENT_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_referer() -> String {
    DEFAULT_REFERER.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_refresh_secs() -> u64 {
    DEFAULT_REFRESH_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_content_url")]
    pub content_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_referer")]
    pub referer: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_refresh_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub fetcher: FetcherKind,
    /// argv for `fetcher = "command"`.
    #[serde(default)]
    pub command: Vec<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            token_url: default_token_url(),
            content_url: default_content_url(),
            user_agent: default_user_agent(),
            referer: default_referer(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            fetcher: FetcherKind::Http,
            command: Vec::new(),
        }
    }
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading upstream config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing upstream config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Load using env var + fallbacks, then apply env overrides:
    /// 1) $UPSTREAM_CONFIG_PATH
    /// 2) config/upstream.toml
    /// 3) config/upstream.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let toml_p = PathBuf::from("config/upstream.toml");
            let json_p = PathBuf::from("config/upstream.json");
            if toml_p.exists() {
                Self::load_from(&toml_p)?
            } else if json_p.exists() {
                Self::load_from(&json_p)?
            } else {
                Self::default()
            }
        };
        Ok(base.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_non_empty(ENV_TOKEN_URL) {
            self.token_url = v;
        }
        if let Some(v) = env_non_empty(ENV_CONTENT_URL) {
            self.content_url = v;
        }
        if let Some(raw) = env_non_empty(ENV_REFRESH_INTERVAL) {
            match raw.parse::<u64>() {
                Ok(secs) => self.refresh_interval_secs = secs,
                Err(e) => tracing::warn!(
                    target: "ingest",
                    "{ENV_REFRESH_INTERVAL}={raw:?} is not a number of seconds ({e}); keeping {}s",
                    self.refresh_interval_secs
                ),
            }
        }
        self.sanitized()
    }

    fn sanitized(mut self) -> Self {
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        if self.refresh_interval_secs == 0 {
            self.refresh_interval_secs = DEFAULT_REFRESH_SECS;
        }
        self
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<UpstreamConfig> {
    if hint_ext == "json" {
        return Ok(serde_json::from_str(s)?);
    }
    match toml::from_str(s) {
        Ok(cfg) => Ok(cfg),
        Err(toml_err) => serde_json::from_str(s)
            .map_err(|_| anyhow!("unsupported upstream config format: {toml_err}")),
    }
}
