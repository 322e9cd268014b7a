//! Escalation entry points and live validation

use std::sync::Arc;

use tracing::{debug, info};

use element_locator::{HeuristicEngine, LocatorQuery};
use page_adapter::{ElementRef, PageDriver, Probe, PROBE_TIMEOUT};

use crate::client::{EscalationConfig, LlmClient};
use crate::snapshot::sanitize_snapshot;

/// Distinguishes a disabled escalation from one that ran and found
/// nothing; callers that only care about the element use `element()`.
#[derive(Debug, Clone)]
pub enum EscalationOutcome {
    /// Escalation disabled or no credential configured.
    NotAttempted,
    /// Service consulted; no suggestion survived validation.
    NoSuggestion,
    /// A suggested selector validated against the live page.
    Validated {
        element: ElementRef,
        selector: String,
        strategy: String,
        confidence: f64,
    },
}

impl EscalationOutcome {
    pub fn element(&self) -> Option<&ElementRef> {
        match self {
            EscalationOutcome::Validated { element, .. } => Some(element),
            _ => None,
        }
    }

    pub fn was_attempted(&self) -> bool {
        !matches!(self, EscalationOutcome::NotAttempted)
    }
}

/// AI-backed locator: snapshot, suggest, validate.
pub struct AiLocator {
    driver: Arc<dyn PageDriver>,
    client: LlmClient,
}

impl AiLocator {
    pub fn new(driver: Arc<dyn PageDriver>, config: EscalationConfig) -> Self {
        Self {
            driver,
            client: LlmClient::new(config),
        }
    }

    /// Best-effort resolution. Every failure mode inside degrades to
    /// `NoSuggestion`; a missing credential is `NotAttempted`.
    pub async fn locate(&self, description: &str) -> EscalationOutcome {
        if !self.client.config().is_available() {
            return EscalationOutcome::NotAttempted;
        }

        let html = match self.driver.page_html().await {
            Ok(html) => html,
            Err(err) => {
                debug!("snapshot capture failed: {}", err);
                return EscalationOutcome::NoSuggestion;
            }
        };
        let snapshot = sanitize_snapshot(&html, self.client.config().snapshot_budget);

        let suggestion = match self.client.suggest(description, &snapshot).await {
            Some(suggestion) => suggestion,
            None => return EscalationOutcome::NoSuggestion,
        };
        debug!(
            "suggestion for '{}': {} (confidence {:.2}, {} alternatives)",
            description,
            suggestion.selector,
            suggestion.confidence,
            suggestion.alternatives.len()
        );

        // Primary first, then alternatives in listed order.
        for selector in suggestion.selectors_in_order() {
            if let Some(element) = self.validate(selector).await {
                info!("escalation validated selector '{}'", selector);
                return EscalationOutcome::Validated {
                    element,
                    selector: selector.to_string(),
                    strategy: suggestion.strategy.clone(),
                    confidence: suggestion.confidence,
                };
            }
        }
        EscalationOutcome::NoSuggestion
    }

    /// A selector validates when it matches a visible element within the
    /// probe timeout.
    async fn validate(&self, selector: &str) -> Option<ElementRef> {
        let probe = Probe::selector(selector);
        let matches = self.driver.query(&probe, PROBE_TIMEOUT).await.ok()?;
        for element in matches {
            if self
                .driver
                .is_visible(&element, PROBE_TIMEOUT)
                .await
                .unwrap_or(false)
            {
                return Some(element);
            }
        }
        None
    }
}

/// Heuristics first; the AI stage only runs on total heuristic failure.
pub struct HybridLocator {
    engine: HeuristicEngine,
    ai: AiLocator,
}

impl HybridLocator {
    pub fn new(driver: Arc<dyn PageDriver>, config: EscalationConfig) -> Self {
        Self {
            engine: HeuristicEngine::new(driver.clone()),
            ai: AiLocator::new(driver, config),
        }
    }

    pub async fn find(&self, query: &LocatorQuery) -> Option<ElementRef> {
        if let Some(element) = self.engine.find_element(query).await {
            return Some(element);
        }
        debug!(
            "heuristics exhausted for '{}', escalating",
            query.description
        );
        self.ai
            .locate(&query.description)
            .await
            .element()
            .cloned()
    }
}
