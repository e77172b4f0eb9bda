// src/ingest/sanitize.rs
//! Branding rewrite over the serialized listing.
//!
//! Strips the upstream player wrapper from links and replaces every surface
//! form of the upstream brand with our own, then parses the text back.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::ingest::error::SanitizeError;
use crate::ingest::types::ListingItem;

pub const BRAND_NAME: &str = "smartrz";

// `https://[www.]rolexcoderz.xyz/Player/?url=<target>` → `<target>`
static RE_PLAYER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://(?:www\.)?rolexcoderz\.xyz/Player/\?url=").expect("valid regex")
});

// Order matters: the phrase and domain forms go before the bare name.
static RE_BRAND_FORMS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)rolex coderz").expect("valid regex"),
        Regex::new(r"(?i)rolexcoderz\.xyz").expect("valid regex"),
        Regex::new(r"(?i)rolexcoderz").expect("valid regex"),
    ]
});

/// Rewrite a serialized string. Pure, total, and idempotent.
pub fn rewrite(text: &str) -> String {
    let mut out = RE_PLAYER_PREFIX.replace_all(text, "").into_owned();
    for re in RE_BRAND_FORMS.iter() {
        out = re.replace_all(&out, BRAND_NAME).into_owned();
    }
    out
}

/// Sanitize decoded items into listing items. Shape-preserving: the
/// output has exactly as many items as the input.
pub fn sanitize(items: Vec<Value>) -> Result<Vec<ListingItem>, SanitizeError> {
    let before = items.len();
    let serialized = Value::Array(items).to_string();
    let rewritten = rewrite(&serialized);
    let out: Vec<ListingItem> = serde_json::from_str(&rewritten)?;
    if out.len() != before {
        return Err(SanitizeError::ShapeChanged {
            before,
            after: out.len(),
        });
    }
    Ok(out)
}
