// src/ingest/decode.rs
//! Payload decoding: base64 transport → JSON → flat list of raw items.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde_json::Value;

use crate::ingest::error::DecodeError;
use crate::ingest::types::RawEnvelope;

/// Decode the envelope payload into raw items.
///
/// A parsed object with an array-valued `data` field is unwrapped to that
/// array; anything else must already be an array. All-or-nothing: no
/// partial lists are produced.
pub fn decode(envelope: &RawEnvelope) -> Result<Vec<Value>, DecodeError> {
    let bytes = decode_transport(&envelope.payload)?;
    let decoded = String::from_utf8_lossy(&bytes).into_owned();

    let parsed: Value = match serde_json::from_str(&decoded) {
        Ok(v) => v,
        Err(source) => return Err(DecodeError::Parse { source, decoded }),
    };

    match unwrap_nested(parsed) {
        Value::Array(items) => Ok(items),
        other => Err(DecodeError::NotAList(kind(&other))),
    }
}

/// Upstream pads inconsistently and has been seen sending URL-safe output.
fn decode_transport(payload: &str) -> Result<Vec<u8>, DecodeError> {
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    match STANDARD.decode(&compact) {
        Ok(b) => Ok(b),
        Err(first) => [STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD]
            .iter()
            .find_map(|engine| engine.decode(&compact).ok())
            .ok_or(DecodeError::Base64(first)),
    }
}

fn unwrap_nested(parsed: Value) -> Value {
    match parsed {
        Value::Object(mut obj) if obj.get("data").is_some_and(Value::is_array) => {
            obj.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
