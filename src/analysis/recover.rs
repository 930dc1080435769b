//! Lenient JSON handling for language-model output.
//!
//! Models sometimes wrap the requested JSON object in prose or code fences.
//! [`recover_json`] parses the text directly and, failing that, retries on
//! the span from the first `{` to the last `}`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::AnalysisError;

static EMBEDDED_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("embedded-object pattern is valid"));

/// Parse `text` as JSON, falling back to the first embedded `{…}` span.
///
/// # Errors
///
/// [`AnalysisError::MalformedResponse`] when neither attempt yields JSON.
pub fn recover_json(text: &str) -> Result<Value, AnalysisError> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(direct) => {
            let span = EMBEDDED_OBJECT
                .find(text)
                .ok_or_else(|| AnalysisError::MalformedResponse(direct.to_string()))?;
            log::debug!("analysis: recovering JSON object embedded in model output");
            serde_json::from_str(span.as_str())
                .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))
        }
    }
}

/// Pull the generated text out of a model response envelope
/// (`candidates[0].content.parts[0].text`).
///
/// A missing or oddly shaped envelope yields an empty string; the caller's
/// next parse step reports the failure.
pub fn extract_generated_text(envelope: &Value) -> String {
    envelope["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}
