use crate::services::expansion::ExpansionError;
use serde_json::Value;
use std::collections::HashSet;

/// Extract a JSON array of strings from a model reply
///
/// Accepts the array bare or wrapped in a fenced code block (with or
/// without a language tag). Items are trimmed; empty and repeated items are
/// dropped. Anything else is an `InvalidResponse`.
pub fn parse_suggestions(raw: &str) -> Result<Vec<String>, ExpansionError> {
    let body = strip_code_fence(raw);

    let value: Value = serde_json::from_str(body)
        .map_err(|e| ExpansionError::InvalidResponse(format!("reply is not JSON: {}", e)))?;

    let items = value
        .as_array()
        .ok_or_else(|| ExpansionError::InvalidResponse("reply is not a JSON array".into()))?;

    let mut seen = HashSet::new();
    let mut suggestions = Vec::with_capacity(items.len());
    for item in items {
        let text = item
            .as_str()
            .ok_or_else(|| ExpansionError::InvalidResponse("array item is not a string".into()))?
            .trim();
        if !text.is_empty() && seen.insert(text.to_string()) {
            suggestions.push(text.to_string());
        }
    }

    Ok(suggestions)
}

/// Remove a surrounding ``` fence, if present
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the optional language tag on the opening line
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };

    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
