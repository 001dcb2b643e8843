//! # Model Output Extraction
//!
//! The model answers in free text. This module isolates the step that turns that
//! text into a `RawQueryFilter`: locate the JSON object, then parse it leniently.

use crate::{errors::PromptError, types::RawQueryFilter};
use regex::Regex;
use tracing::{debug, error};

/// Returns the substring from the first `{` to the last `}` in the response.
///
/// Markdown fences and chatter around the object are dropped by construction.
pub fn extract_json_object(text: &str) -> Result<&str, PromptError> {
    let re = Regex::new(r"\{[\s\S]*\}")?;
    re.find(text)
        .map(|m| m.as_str())
        .ok_or_else(|| PromptError::NoJsonFound(text.to_string()))
}

/// Extracts and parses the model's filter.
pub fn parse_raw_filter(text: &str) -> Result<RawQueryFilter, PromptError> {
    let json_str = extract_json_object(text).inspect_err(|_| {
        error!("No JSON found in AI response");
        debug!("Response without JSON: {}", text);
    })?;

    serde_json::from_str::<RawQueryFilter>(json_str).map_err(|e| {
        error!("Error parsing filter JSON: {e}");
        debug!("JSON string: {}", json_str);
        PromptError::from(e)
    })
}
