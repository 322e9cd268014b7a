//! Locator engine: pipeline orchestration, scoring, safe interactions

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use page_adapter::{ElementRef, PageDriver, PROBE_TIMEOUT};

use crate::errors::LocatorError;
use crate::stages::{stage_pipeline, Stage};
use crate::types::{LocatorCandidate, LocatorQuery};

/// Fixed delay between safe click/fill attempts.
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Runs the ordered stage pipeline against a live page.
pub struct HeuristicEngine {
    driver: Arc<dyn PageDriver>,
    stages: Vec<Box<dyn Stage>>,
}

impl HeuristicEngine {
    pub fn new(driver: Arc<dyn PageDriver>) -> Self {
        Self {
            driver,
            stages: stage_pipeline(),
        }
    }

    pub fn driver(&self) -> &Arc<dyn PageDriver> {
        &self.driver
    }

    /// Resolve a description to an element. A miss is `None`, never an
    /// error; the pipeline stops at the first stage with any match.
    pub async fn find_element(&self, query: &LocatorQuery) -> Option<ElementRef> {
        for stage in &self.stages {
            let matches = stage.resolve(&self.driver, query).await;
            if let Some(first) = matches.into_iter().next() {
                debug!(
                    "'{}' resolved by {} stage -> {}",
                    query.description,
                    stage.name(),
                    first.id
                );
                return Some(first);
            }
            debug!("stage {} missed '{}'", stage.name(), query.description);
        }
        debug!("all stages missed '{}'", query.description);
        None
    }

    /// Score pre-gathered candidates and pick the best:
    /// - invisible within a short timeout disqualifies
    /// - enabled +10, disabled +5
    /// - +5 when the description contains the candidate text's first word
    /// - ties break by original order
    ///
    /// When no candidate confirms visibility the first is returned:
    /// visibility could not be confirmed, not refuted.
    pub async fn find_best_match(
        &self,
        description: &str,
        candidates: Vec<ElementRef>,
    ) -> Option<ElementRef> {
        if candidates.is_empty() {
            return None;
        }
        let description_lower = description.to_lowercase();

        let mut best: Option<LocatorCandidate> = None;
        for element in &candidates {
            let visible = self
                .driver
                .is_visible(element, PROBE_TIMEOUT)
                .await
                .unwrap_or(false);
            if !visible {
                continue;
            }

            let enabled = self.driver.is_enabled(element).await.unwrap_or(false);
            let mut score = if enabled { 10 } else { 5 };

            if let Ok(Some(text)) = self.driver.text_of(element).await {
                if let Some(first_word) = text.split_whitespace().next() {
                    if description_lower.contains(&first_word.to_lowercase()) {
                        score += 5;
                    }
                }
            }

            debug!("candidate {} scored {}", element.id, score);
            let replace = match &best {
                Some(current) => score > current.score.unwrap_or(i32::MIN),
                None => true,
            };
            if replace {
                let mut candidate = LocatorCandidate::new(element.clone());
                candidate.score = Some(score);
                best = Some(candidate);
            }
        }

        match best {
            Some(candidate) => Some(candidate.element),
            None => {
                debug!("no candidate confirmed visible for '{}'", description);
                candidates.into_iter().next()
            }
        }
    }

    /// Resolve and click, with bounded retries and a fixed delay.
    pub async fn safe_click(&self, query: &LocatorQuery) -> Result<(), LocatorError> {
        self.with_retries(query, |element| {
            let driver = self.driver.clone();
            async move {
                driver
                    .click(&element, PROBE_TIMEOUT)
                    .await
                    .map_err(|err| LocatorError::InteractionFailed(err.to_string()))
            }
        })
        .await
    }

    /// Resolve and fill, with bounded retries and a fixed delay.
    pub async fn safe_fill(&self, query: &LocatorQuery, text: &str) -> Result<(), LocatorError> {
        let text = text.to_string();
        self.with_retries(query, |element| {
            let driver = self.driver.clone();
            let text = text.clone();
            async move {
                driver
                    .fill(&element, &text, PROBE_TIMEOUT)
                    .await
                    .map_err(|err| LocatorError::InteractionFailed(err.to_string()))
            }
        })
        .await
    }

    async fn with_retries<F, Fut>(
        &self,
        query: &LocatorQuery,
        action: F,
    ) -> Result<(), LocatorError>
    where
        F: Fn(ElementRef) -> Fut,
        Fut: std::future::Future<Output = Result<(), LocatorError>>,
    {
        let attempts = query.retries.max(1);
        for attempt in 1..=attempts {
            if let Some(element) = self.find_element(query).await {
                match action(element).await {
                    Ok(()) => {
                        info!("'{}' succeeded on attempt {}", query.description, attempt);
                        return Ok(());
                    }
                    Err(err) => {
                        warn!(
                            "attempt {} on '{}' failed: {}",
                            attempt, query.description, err
                        );
                    }
                }
            } else {
                debug!(
                    "attempt {}: '{}' did not resolve",
                    attempt, query.description
                );
            }
            if attempt < attempts {
                sleep(RETRY_DELAY).await;
            }
        }
        Err(LocatorError::ElementNotFound(format!(
            "'{}' did not resolve after {} attempts",
            query.description, attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_adapter::{FixtureDriver, FixtureElement, FixturePage};

    fn engine_with(page: FixturePage) -> HeuristicEngine {
        HeuristicEngine::new(Arc::new(FixtureDriver::single("https://x.test/", page)))
    }

    #[tokio::test]
    async fn test_text_stage_beats_structural() {
        // Both a text match and a structural "button" match exist; the
        // earlier text stage must win deterministically.
        let page = FixturePage::new()
            .element(FixtureElement::new("structural", "button"))
            .element(FixtureElement::new("labelled", "span").text("Save Button"));
        let engine = engine_with(page);

        let found = engine
            .find_element(&LocatorQuery::new("Save Button"))
            .await
            .unwrap();
        assert_eq!(found.id, "labelled");
    }

    #[tokio::test]
    async fn test_miss_is_none_not_error() {
        let engine = engine_with(FixturePage::new());
        assert!(engine
            .find_element(&LocatorQuery::new("nothing like this"))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_best_match_prefers_visible_enabled() {
        let page = FixturePage::new()
            .element(FixtureElement::new("ghost", "button").text("Save").hidden())
            .element(
                FixtureElement::new("frozen", "button")
                    .text("Save")
                    .disabled(),
            )
            .element(FixtureElement::new("live", "button").text("Save"));
        let engine = engine_with(page);

        let candidates = vec![
            ElementRef::new("ghost", "button"),
            ElementRef::new("frozen", "button"),
            ElementRef::new("live", "button"),
        ];
        let best = engine.find_best_match("Save", candidates).await.unwrap();
        assert_eq!(best.id, "live");
    }

    #[tokio::test]
    async fn test_best_match_falls_back_to_first_when_none_visible() {
        let page = FixturePage::new()
            .element(FixtureElement::new("a", "button").text("Save").hidden())
            .element(FixtureElement::new("b", "button").text("Save").hidden());
        let engine = engine_with(page);

        let candidates = vec![ElementRef::new("a", "button"), ElementRef::new("b", "button")];
        let best = engine.find_best_match("Save", candidates).await.unwrap();
        assert_eq!(best.id, "a");
    }

    #[tokio::test]
    async fn test_best_match_tie_breaks_by_order() {
        let page = FixturePage::new()
            .element(FixtureElement::new("first", "button").text("Save"))
            .element(FixtureElement::new("second", "button").text("Save"));
        let engine = engine_with(page);

        let candidates = vec![
            ElementRef::new("first", "button"),
            ElementRef::new("second", "button"),
        ];
        let best = engine.find_best_match("Save", candidates).await.unwrap();
        assert_eq!(best.id, "first");
    }

    #[tokio::test]
    async fn test_safe_click_retries_then_fails() {
        let engine = engine_with(FixturePage::new());
        let query = LocatorQuery::new("phantom button").with_retries(2);
        let err = engine.safe_click(&query).await.unwrap_err();
        assert!(matches!(err, LocatorError::ElementNotFound(_)));
        assert!(err.to_string().contains("phantom button"));
    }

    #[tokio::test]
    async fn test_safe_fill_on_labelled_input() {
        let page = FixturePage::new().element(
            FixtureElement::new("email", "input")
                .label("Email")
                .attr("placeholder", "Enter email"),
        );
        let engine = engine_with(page);
        let query = LocatorQuery::new("이메일");
        engine.safe_fill(&query, "user@example.com").await.unwrap();
    }
}
