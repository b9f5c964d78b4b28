//! Parsing of structured model output.
//!
//! The classifier and extractor demand bare JSON, but models routinely wrap
//! their answer in fenced code blocks. This module strips such wrappers and
//! parses the remainder, reporting failure as a value instead of falling
//! through exception chains.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors produced while parsing model output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("model output is not valid JSON: {0}")]
    NotJson(String),

    #[error("model output is not a JSON object")]
    NotObject,
}

/// Strip a fenced code block wrapper, if present.
///
/// Handles ```json ... ``` and plain ``` ... ``` fences; anything outside the
/// first fenced section is discarded.
pub fn strip_code_fences(raw: &str) -> &str {
    let cleaned = raw.trim();
    let Some(rest) = cleaned.strip_prefix("```") else {
        return cleaned;
    };
    let inner = rest.split("```").next().unwrap_or(rest);
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.trim()
}

/// Parse model output into a JSON value, stripping fences first.
pub fn parse_json(raw: &str) -> Result<Value, ParseError> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(cleaned).map_err(|e| ParseError::NotJson(e.to_string()))
}

/// Parse model output into a JSON object, stripping fences first.
pub fn parse_object(raw: &str) -> Result<Map<String, Value>, ParseError> {
    match parse_json(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(ParseError::NotObject),
    }
}
