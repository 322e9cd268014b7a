//! Wire schema for selector suggestions

use serde::Deserialize;
use tracing::debug;

/// Structured suggestion returned by the language-model service.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorSuggestion {
    pub selector: String,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl SelectorSuggestion {
    /// All selectors to validate, primary first, in listed order.
    pub fn selectors_in_order(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.selector.as_str())
            .chain(self.alternatives.iter().map(String::as_str))
    }
}

/// Parse a suggestion out of a model reply. The reply may wrap the JSON
/// in prose or a code fence; anything unparsable is `None`.
pub fn parse_suggestion(reply: &str) -> Option<SelectorSuggestion> {
    let json = extract_json_object(reply)?;
    match serde_json::from_str::<SelectorSuggestion>(&json) {
        Ok(suggestion) if !suggestion.selector.trim().is_empty() => Some(suggestion),
        Ok(_) => {
            debug!("suggestion had empty selector");
            None
        }
        Err(err) => {
            debug!("suggestion JSON unparsable: {}", err);
            None
        }
    }
}

/// First balanced JSON object in `raw`, unwrapping code fences.
fn extract_json_object(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    for (idx, ch) in raw[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(raw[start..start + idx + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }
    None
}
