//! JSON extraction from model replies that may wrap the object in Markdown fences or prose.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Returns the outermost JSON object of `text`.
pub fn extract_json(text: &str) -> Result<Value> {
    let body = strip_fences(text);
    let start = body.find('{');
    let end = body.rfind('}');
    let slice = match (start, end) {
        (Some(s), Some(e)) if s < e => &body[s..=e],
        _ => {
            let preview: String = text.chars().take(200).collect();
            return Err(anyhow!("No JSON object in model reply: {}", preview));
        }
    };
    serde_json::from_str(slice).with_context(|| {
        let preview: String = slice.chars().take(200).collect();
        format!("Failed to parse JSON from model reply: {}", preview)
    })
}

/// [`extract_json`] followed by deserialization into `T`.
pub fn extract_json_as<T: DeserializeOwned>(text: &str) -> Result<T> {
    let value = extract_json(text)?;
    serde_json::from_value(value).context("Model reply JSON has unexpected shape")
}
