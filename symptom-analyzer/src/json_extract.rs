//! Tolerant extraction of the first JSON object from model output.
//!
//! Models wrap JSON in prose or markdown fences. Instead of trusting the
//! whole reply, scan for the first `{` and walk to its matching `}`,
//! honouring string literals and escapes, then hand only that slice to
//! `serde_json`.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Why no usable object could be pulled out of the text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON object found in model output")]
    NoJsonObject,

    #[error("JSON object starting at byte {start} is never closed")]
    Unterminated { start: usize },

    #[error("JSON object is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Returns the first balanced `{...}` slice of `text`.
pub fn first_object_span(text: &str) -> Result<&str, ExtractError> {
    let start = text.find('{').ok_or(ExtractError::NoJsonObject)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Ok(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    Err(ExtractError::Unterminated { start })
}

/// Extracts the first object and deserializes it into `T`.
pub fn extract_first_object<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let span = first_object_span(text)?;
    Ok(serde_json::from_str(span)?)
}
