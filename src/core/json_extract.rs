// src/core/json_extract.rs
//! Pulls a JSON object out of free-form model output

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::utils::preview;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("completion text is empty")]
    Empty,

    #[error("completion is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Removes every markdown code fence marker, with or without a `json` tag.
pub fn strip_code_fences(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut rest = text.trim();

    while let Some(pos) = rest.find("```") {
        cleaned.push_str(&rest[..pos]);
        let after = &rest[pos + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        rest = after.trim_start();
    }
    cleaned.push_str(rest);

    cleaned
}

/// Narrows text to the span between the first `{` and the last `}`.
/// Text without such a span is returned unchanged.
pub fn json_object_span(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start <= end => &text[start..=end],
        _ => text,
    }
}

pub fn extract_json<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractError> {
    if raw.trim().is_empty() {
        return Err(ExtractError::Empty);
    }

    let cleaned = strip_code_fences(raw);
    let candidate = json_object_span(&cleaned);
    debug!("Cleaned completion: {}", preview(candidate));

    Ok(serde_json::from_str(candidate)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_strip_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}\n");
    }

    #[test]
    fn test_strip_fences_without_tag() {
        let input = "```\n{\"a\": 1}```";
        assert_eq!(strip_code_fences(input), "{\"a\": 1}");
    }

    #[test]
    fn test_span_drops_surrounding_prose() {
        let input = "Here is the analysis: {\"a\": {\"b\": 2}} Hope that helps!";
        assert_eq!(json_object_span(input), "{\"a\": {\"b\": 2}}");
    }

    #[test]
    fn test_span_without_braces_is_unchanged() {
        assert_eq!(json_object_span("no json here"), "no json here");
        assert_eq!(json_object_span("} reversed {"), "} reversed {");
    }

    #[test]
    fn test_extract_fenced_and_wrapped() {
        let raw = "Sure!\n```json\n{\"totalScore\": 72, \"note\": \"uses {braces}\"}\n```\nThanks";
        let value: Value = extract_json(raw).unwrap();
        assert_eq!(value["totalScore"], 72);
        assert_eq!(value["note"], "uses {braces}");
    }

    #[test]
    fn test_extract_empty() {
        let result: Result<Value, _> = extract_json("   \n");
        assert!(matches!(result, Err(ExtractError::Empty)));
    }

    #[test]
    fn test_extract_invalid() {
        let result: Result<Value, _> = extract_json("I could not analyze this resume.");
        assert!(matches!(result, Err(ExtractError::Parse(_))));

        let truncated: Result<Value, _> = extract_json("{\"totalScore\": 72, \"sections\": [");
        assert!(matches!(truncated, Err(ExtractError::Parse(_))));
    }
}
