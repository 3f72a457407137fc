//! JSON extraction from free-text LLM output.
//!
//! Models routinely wrap JSON in markdown fences or surround it with prose
//! despite explicit instructions. Extraction strips fence markers, takes the
//! greedy span from the first `{` to the last `}`, and parses it. If the
//! greedy span does not parse (stray braces, multiple objects), a
//! brace-depth scan tries each balanced top-level object in order and keeps
//! the first that parses.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON object found in LLM response")]
    NoJsonObject,

    #[error("extracted span is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Extracts and parses the JSON object embedded in raw model output.
pub fn extract_json(raw: &str) -> Result<Value, ExtractError> {
    let stripped = strip_fences(raw);

    let start = stripped.find('{').ok_or(ExtractError::NoJsonObject)?;
    let end = stripped.rfind('}').ok_or(ExtractError::NoJsonObject)?;
    if end < start {
        return Err(ExtractError::NoJsonObject);
    }

    match serde_json::from_str(&stripped[start..=end]) {
        Ok(value) => Ok(value),
        Err(greedy_err) => {
            first_balanced_object(&stripped).ok_or(ExtractError::Parse(greedy_err))
        }
    }
}

/// Removes every "```json" opener (any case) and every bare "```" marker.
fn strip_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some((start, len)) = find_fence(rest) {
        out.push_str(&rest[..start]);
        rest = &rest[start + len..];
    }
    out.push_str(rest);
    out
}

/// Locates the next fence marker and its byte length.
/// "```json" is matched case-insensitively; anything else is a bare "```".
fn find_fence(text: &str) -> Option<(usize, usize)> {
    let start = text.find("```")?;
    let after = text[start + 3..].as_bytes();
    if after.len() >= 4 && after[..4].eq_ignore_ascii_case(b"json") {
        Some((start, 7))
    } else {
        Some((start, 3))
    }
}

/// Scans for balanced top-level `{...}` spans, string-literal aware, and
/// returns the first span that parses as JSON.
fn first_balanced_object(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut span_start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            // Quotes only open strings inside a candidate span; prose quotes
            // outside any object must not swallow a following brace.
            b'"' if depth > 0 => in_string = true,
            b'{' => {
                if depth == 0 {
                    span_start = Some(i);
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(start) = span_start.take() {
                        if let Ok(value) = serde_json::from_str(&text[start..=i]) {
                            return Some(value);
                        }
                    }
                }
            }
            _ => {}
        }
    }
    None
}
