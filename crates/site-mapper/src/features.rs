//! Per-page UI feature detection

use std::sync::Arc;

use tracing::debug;

use page_adapter::{PageDriver, Probe, PROBE_TIMEOUT};
use sitepilot_core_types::{FeatureHit, FeatureKind};

/// Fixed ordered probe catalog. Each probe is independent and
/// visibility-gated; absence of a feature is not an error.
const FEATURE_CATALOG: &[(&str, FeatureKind, &str)] = &[
    ("table", FeatureKind::Table, "data table"),
    ("[role=grid]", FeatureKind::Table, "grid widget"),
    ("form", FeatureKind::Form, "input form"),
    ("[type=search]", FeatureKind::Search, "search input"),
    (".search-box", FeatureKind::Search, "search box"),
    (".filter", FeatureKind::Filter, "filter control"),
    ("[role=dialog]", FeatureKind::Modal, "dialog"),
    (".modal", FeatureKind::Modal, "modal container"),
    (".card", FeatureKind::Card, "card"),
    ("canvas", FeatureKind::Chart, "chart canvas"),
    (".chart", FeatureKind::Chart, "chart container"),
    (".stats", FeatureKind::Stats, "stats block"),
    (".stat-card", FeatureKind::Stats, "stat card"),
    ("[role=list]", FeatureKind::List, "list widget"),
    (".list-group", FeatureKind::List, "list group"),
    (".btn-group", FeatureKind::ButtonGroup, "button group"),
    ("[role=toolbar]", FeatureKind::ButtonGroup, "toolbar"),
];

/// Probes a single page for the presence of the fixed feature catalog.
pub struct FeatureDetector {
    driver: Arc<dyn PageDriver>,
}

impl FeatureDetector {
    pub fn new(driver: Arc<dyn PageDriver>) -> Self {
        Self { driver }
    }

    /// Detect features on the current page. One hit per catalog kind at
    /// most; later probes for an already-detected kind are skipped.
    pub async fn detect(&self) -> Vec<FeatureHit> {
        let mut hits: Vec<FeatureHit> = Vec::new();

        for (selector, kind, description) in FEATURE_CATALOG {
            if hits.iter().any(|h| h.kind == *kind) {
                continue;
            }
            let probe = Probe::selector(*selector);
            let matches = match self.driver.query(&probe, PROBE_TIMEOUT).await {
                Ok(matches) => matches,
                Err(err) => {
                    debug!("feature probe {} failed: {}", selector, err);
                    continue;
                }
            };

            let mut visible = false;
            for element in &matches {
                match self.driver.is_visible(element, PROBE_TIMEOUT).await {
                    Ok(true) => {
                        visible = true;
                        break;
                    }
                    Ok(false) => {}
                    Err(err) => debug!("visibility check failed for {}: {}", selector, err),
                }
            }

            if visible {
                debug!("detected {} via {}", kind, selector);
                hits.push(FeatureHit::new(*kind, *selector).with_description(*description));
            }
        }

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_adapter::{FixtureDriver, FixtureElement, FixturePage};

    #[tokio::test]
    async fn test_detects_visible_features_only() {
        let page = FixturePage::new()
            .element(FixtureElement::new("t", "table"))
            .element(FixtureElement::new("f", "form").hidden())
            .element(FixtureElement::new("s", "input").attr("type", "search"));
        let driver = Arc::new(FixtureDriver::single("https://x.test/", page));

        let hits = FeatureDetector::new(driver).detect().await;
        let kinds: Vec<FeatureKind> = hits.iter().map(|h| h.kind).collect();
        assert!(kinds.contains(&FeatureKind::Table));
        assert!(kinds.contains(&FeatureKind::Search));
        assert!(!kinds.contains(&FeatureKind::Form));
    }

    #[tokio::test]
    async fn test_one_hit_per_kind() {
        let page = FixturePage::new()
            .element(FixtureElement::new("t1", "table"))
            .element(FixtureElement::new("t2", "div").attr("role", "grid"));
        let driver = Arc::new(FixtureDriver::single("https://x.test/", page));

        let hits = FeatureDetector::new(driver).detect().await;
        assert_eq!(
            hits.iter().filter(|h| h.kind == FeatureKind::Table).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_empty_page_detects_nothing() {
        let driver = Arc::new(FixtureDriver::single("https://x.test/", FixturePage::new()));
        assert!(FeatureDetector::new(driver).detect().await.is_empty());
    }
}
