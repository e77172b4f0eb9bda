// src/ingest/error.rs
//! Failure taxonomy for the per-category pipeline.
//!
//! Every variant is caught at the category boundary (`Pipeline::run_category`)
//! and downgraded to an empty listing; nothing here reaches readers.

use thiserror::Error;

/// Pipeline stage a failure came from, used as a log field and metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authenticate,
    Fetch,
    Decode,
    Sanitize,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Authenticate => "authenticate",
            Stage::Fetch => "fetch",
            Stage::Decode => "decode",
            Stage::Sanitize => "sanitize",
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("authentication failed: {0}")]
    Authentication(#[from] AuthError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("sanitize failed: {0}")]
    Sanitize(#[from] SanitizeError),
}

impl IngestError {
    pub fn stage(&self) -> Stage {
        match self {
            IngestError::Authentication(_) => Stage::Authenticate,
            IngestError::Fetch(_) => Stage::Fetch,
            IngestError::Decode(_) => Stage::Decode,
            IngestError::Sanitize(_) => Stage::Sanitize,
        }
    }
}

/// Token endpoint unreachable or returned an unusable body.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("token endpoint returned HTTP {0}")]
    Status(u16),

    #[error("token response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("token response is not an object")]
    NotAnObject,

    #[error("token response missing '{0}'")]
    MissingField(&'static str),
}

/// Content endpoint unreachable, non-success, or malformed envelope.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("content request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("content endpoint returned HTTP {0}")]
    Status(u16),

    #[error("content response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid content envelope: {0}")]
    MalformedEnvelope(String),

    #[error("no 'data' field in content response")]
    MissingPayload,

    #[error("fetch command failed: {0}")]
    Command(String),
}

/// Transport decode or inner parse failure.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded payload is not valid JSON: {source}; decoded: {}", truncated(.decoded, 160))]
    Parse {
        #[source]
        source: serde_json::Error,
        /// Full decoded text, kept for diagnosis.
        decoded: String,
    },

    #[error("decoded payload is not a list (got {0})")]
    NotAList(&'static str),
}

/// Rewritten text no longer parses back into listing items.
#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("rewritten listing failed to parse: {0}")]
    Reparse(#[from] serde_json::Error),

    #[error("rewrite changed item count from {before} to {after}")]
    ShapeChanged { before: usize, after: usize },
}

/// Cut `s` to at most `max` chars for log and error messages.
pub(crate) fn truncated(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max).collect();
        format!("{head}…")
    } else {
        s.to_string()
    }
}
