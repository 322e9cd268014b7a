//! HTTP client for the selector-suggestion service

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::prompt::PromptBuilder;
use crate::schema::{parse_suggestion, SelectorSuggestion};
use crate::snapshot::DEFAULT_SNAPSHOT_BUDGET;

/// Escalation settings. A missing api key disables escalation entirely.
#[derive(Clone, Debug)]
pub struct EscalationConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
    /// Outbound page snapshot budget in bytes.
    pub snapshot_budget: usize,
    pub enabled: bool,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(20),
            snapshot_budget: DEFAULT_SNAPSHOT_BUDGET,
            enabled: true,
        }
    }
}

impl EscalationConfig {
    /// Escalation runs only when enabled and a credential is present.
    pub fn is_available(&self) -> bool {
        self.enabled && self.api_key.as_deref().map(|k| !k.is_empty()).unwrap_or(false)
    }
}

/// Thin chat-completions client; the reply is parsed into a
/// `SelectorSuggestion` or discarded.
pub struct LlmClient {
    client: Client,
    prompt: PromptBuilder,
    config: EscalationConfig,
}

impl LlmClient {
    /// Building the client never fails on a missing key; `suggest` just
    /// returns `None` in that case.
    pub fn new(config: EscalationConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            prompt: PromptBuilder::new(),
            config,
        }
    }

    pub fn config(&self) -> &EscalationConfig {
        &self.config
    }

    /// Ask the service for a selector suggestion. Transport failures,
    /// non-success statuses and malformed replies all read as `None`.
    pub async fn suggest(&self, description: &str, snapshot: &str) -> Option<SelectorSuggestion> {
        let api_key = match (&self.config.api_key, self.config.enabled) {
            (Some(key), true) if !key.is_empty() => key.clone(),
            _ => {
                debug!("escalation not configured; skipping");
                return None;
            }
        };

        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.prompt.system_prompt().to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: self.prompt.build_user_prompt(description, snapshot),
                },
            ],
        };

        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );
        let response = match self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("suggestion request failed: {}", err);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("suggestion service returned {}", response.status());
            return None;
        }

        let reply: ChatCompletionResponse = match response.json().await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("suggestion response invalid: {}", err);
                return None;
            }
        };

        let content = reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)?;
        parse_suggestion(&content)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_requires_key_and_enabled() {
        let none = EscalationConfig::default();
        assert!(!none.is_available());

        let keyed = EscalationConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert!(keyed.is_available());

        let disabled = EscalationConfig {
            api_key: Some("sk-test".to_string()),
            enabled: false,
            ..Default::default()
        };
        assert!(!disabled.is_available());

        let empty = EscalationConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(!empty.is_available());
    }

    #[tokio::test]
    async fn test_suggest_without_key_is_noop() {
        let client = LlmClient::new(EscalationConfig::default());
        assert!(client.suggest("login button", "<html>").await.is_none());
    }
}
