// tests/common/mod.rs
// Scripted credential/content sources shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use smartrz::ingest::error::{AuthError, FetchError};
use smartrz::ingest::types::{Category, ContentSource, Credential, CredentialSource, RawEnvelope};
use smartrz::{Pipeline, SnapshotCache};

/// Content envelope carrying `inner` as the base64 payload.
pub fn encoded(inner: &str) -> Value {
    json!({ "data": STANDARD.encode(inner) })
}

/// Issues a distinct credential per call and counts calls.
#[derive(Default)]
pub struct CountingTokens {
    pub calls: AtomicUsize,
}

#[async_trait]
impl CredentialSource for CountingTokens {
    async fn acquire_credential(&self) -> Result<Credential, AuthError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) as i64;
        Ok(Credential {
            issued_timestamp: 1_700_000_000 + n,
            signature: format!("sig-{n}"),
        })
    }
}

pub struct RejectingTokens;

#[async_trait]
impl CredentialSource for RejectingTokens {
    async fn acquire_credential(&self) -> Result<Credential, AuthError> {
        Err(AuthError::MissingField("signature"))
    }
}

#[derive(Clone)]
pub enum Reply {
    Body(Value),
    Status(u16),
}

/// Answers each category from a mutable script; records every credential it saw.
#[derive(Default)]
pub struct ScriptedContent {
    replies: Mutex<HashMap<Category, Reply>>,
    pub seen: Mutex<Vec<(Category, Credential)>>,
    pub delay: Duration,
}

impl ScriptedContent {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn set(&self, category: Category, reply: Reply) {
        self.replies.lock().unwrap().insert(category, reply);
    }

    pub fn set_items(&self, category: Category, inner_json: &str) {
        self.set(category, Reply::Body(encoded(inner_json)));
    }
}

#[async_trait]
impl ContentSource for ScriptedContent {
    async fn fetch_category(
        &self,
        category: Category,
        credential: &Credential,
    ) -> Result<RawEnvelope, FetchError> {
        self.seen
            .lock()
            .unwrap()
            .push((category, credential.clone()));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let reply = self.replies.lock().unwrap().get(&category).cloned();
        match reply {
            Some(Reply::Body(body)) => RawEnvelope::from_body(body),
            Some(Reply::Status(code)) => Err(FetchError::Status(code)),
            None => Err(FetchError::MissingPayload),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub fn cache_with(
    tokens: Arc<dyn CredentialSource>,
    content: Arc<ScriptedContent>,
) -> Arc<SnapshotCache> {
    Arc::new(SnapshotCache::new(Pipeline::new(tokens, content)))
}
