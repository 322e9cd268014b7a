//! Prompt construction for the selector-suggestion request

/// Builds the fixed-shape prompt pair sent to the language-model service.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn system_prompt(&self) -> &'static str {
        "You are a web automation assistant. Given a snippet of page HTML and a \
         natural-language description of one UI element, respond with a CSS \
         selector for that element. Respond with a single JSON object only, \
         shaped exactly as: {\"selector\": string, \"strategy\": string, \
         \"confidence\": number between 0.0 and 1.0, \"alternatives\": \
         [string, ...]}. Prefer stable attributes (id, name, data-*) over \
         positional selectors."
    }

    pub fn build_user_prompt(&self, description: &str, snapshot: &str) -> String {
        let mut sections = Vec::new();
        sections.push(format!("Element description: {}", description.trim()));
        sections.push(format!("Page HTML (truncated):\n{snapshot}"));
        sections.push(
            "Return the JSON object only, no explanation and no code fence.".to_string(),
        );
        sections.join("\n\n")
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_embeds_description_and_snapshot() {
        let prompt = PromptBuilder::new().build_user_prompt("login button", "<button>Login</button>");
        assert!(prompt.contains("login button"));
        assert!(prompt.contains("<button>Login</button>"));
    }
}
