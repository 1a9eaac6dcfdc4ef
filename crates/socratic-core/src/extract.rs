//! Tolerant extraction of a JSON object from free-form model output.
//!
//! Models are told to answer with JSON only, but often wrap it in prose or
//! a markdown fence. Extraction first tries a strict parse of the whole
//! reply, then falls back to scanning for balanced `{...}` spans.

use serde_json::Value;
use thiserror::Error;

use crate::model::JsonObject;

/// Why no object could be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("reply text is empty")]
    Empty,
    #[error("no JSON object found in reply")]
    NoObject,
}

/// Extract the first JSON object embedded in `text`.
///
/// Balanced `{...}` spans are collected in one pass, tracking nesting depth
/// and ignoring braces inside string literals, then tried in order of their
/// opening brace. A span that fails to parse does not hide the spans nested
/// inside it, and an unmatched `{` simply never forms a span.
pub fn extract_json_object(text: &str) -> Result<JsonObject, ExtractError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::Empty);
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        return Ok(map);
    }

    balanced_spans(trimmed)
        .into_iter()
        .find_map(|(start, end)| {
            match serde_json::from_str::<Value>(&trimmed[start..end]) {
                Ok(Value::Object(map)) => Some(map),
                _ => None,
            }
        })
        .ok_or(ExtractError::NoObject)
}

/// Byte ranges of every matched `{...}` pair, ordered by opening brace.
fn balanced_spans(s: &str) -> Vec<(usize, usize)> {
    let mut open: Vec<usize> = Vec::new();
    let mut spans = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in s.bytes().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            // Quotes only open strings inside a brace; prose apostrophes and quotes are ignored.
            b'"' if !open.is_empty() => in_string = true,
            b'{' => open.push(i),
            b'}' => {
                if let Some(start) = open.pop() {
                    spans.push((start, i + 1));
                }
            }
            _ => {}
        }
    }

    spans.sort_unstable_by_key(|&(start, _)| start);
    spans
}
