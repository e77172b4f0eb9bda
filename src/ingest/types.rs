// src/ingest/types.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

use crate::ingest::error::{truncated, AuthError, FetchError};

/// Content partitions requested independently from upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Live,
    Upcoming,
    Completed,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Live, Category::Upcoming, Category::Completed];

    /// Selector value sent in the content request body (`{"type": ...}`).
    pub fn wire_name(self) -> &'static str {
        match self {
            Category::Live => "live",
            Category::Upcoming => "up",
            Category::Completed => "completed",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Live => "live",
            Category::Upcoming => "upcoming",
            Category::Completed => "completed",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Timestamp + signature pair that authorises exactly one content request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub issued_timestamp: i64,
    pub signature: String,
}

impl Credential {
    /// Build from the auth endpoint body. The timestamp may arrive as a
    /// number or a numeric string; zero and empty values are rejected.
    pub fn from_auth_body(body: &Value) -> Result<Self, AuthError> {
        let obj = body.as_object().ok_or(AuthError::NotAnObject)?;

        let issued_timestamp = match obj.get("timestamp") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .filter(|ts| *ts != 0)
        .ok_or(AuthError::MissingField("timestamp"))?;

        let signature = obj
            .get("signature")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingField("signature"))?
            .to_string();

        Ok(Self {
            issued_timestamp,
            signature,
        })
    }
}

/// Validated content response: an object that carried a non-empty `data` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEnvelope {
    pub payload: String,
}

impl RawEnvelope {
    pub fn from_body(body: Value) -> Result<Self, FetchError> {
        let mut obj = match body {
            Value::Object(obj) => obj,
            other => {
                return Err(FetchError::MalformedEnvelope(truncated(&other.to_string(), 200)))
            }
        };
        match obj.remove("data") {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(Self { payload: s }),
            Some(Value::Null) | None => Err(FetchError::MissingPayload),
            Some(Value::String(_)) => Err(FetchError::MissingPayload),
            Some(other) => Err(FetchError::MalformedEnvelope(format!(
                "'data' is not a string: {}",
                truncated(&other.to_string(), 200)
            ))),
        }
    }
}

/// One class session, kept as the upstream object so every field (including
/// nulls and nested values) survives the rewrite and reaches `/api/data`.
/// Known attributes are read through the accessors below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingItem(Map<String, Value>);

impl ListingItem {
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Scalar field as text. Upstream is loose about types (durations come
    /// back as numbers); null, nested and blank values read as absent.
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.0.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<Cow<'_, str>> {
        self.text("title")
    }

    pub fn description(&self) -> Option<Cow<'_, str>> {
        self.text("description")
    }

    pub fn link(&self) -> Option<Cow<'_, str>> {
        self.text("link")
    }

    /// Heading for the card: `title`, else an upstream `name`, else "Class".
    pub fn display_title(&self) -> Cow<'_, str> {
        self.title()
            .or_else(|| self.text("name"))
            .unwrap_or(Cow::Borrowed("Class"))
    }

    /// Optional attributes in page order, skipping blanks.
    pub fn details(&self) -> impl Iterator<Item = (&'static str, Cow<'_, str>)> {
        ["teacher", "subject", "date", "time", "duration"]
            .into_iter()
            .filter_map(move |k| self.text(k).map(|v| (k, v)))
    }
}

/// Obtains a fresh credential for a single fetch.
#[async_trait::async_trait]
pub trait CredentialSource: Send + Sync {
    async fn acquire_credential(&self) -> Result<Credential, AuthError>;
}

/// Requests one category from upstream and returns the validated envelope.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_category(
        &self,
        category: Category,
        credential: &Credential,
    ) -> Result<RawEnvelope, FetchError>;

    fn name(&self) -> &'static str;
}
