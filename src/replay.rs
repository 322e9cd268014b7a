//! Recorded site replay
//!
//! A recorded site is one JSON document holding a url → page graph plus
//! the starting url. The CLI replays it through `FixtureDriver`, so map
//! builds and crawls run deterministically without a live browser.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use page_adapter::{FixtureDriver, FixturePage, PageDriver};

use crate::errors::SitepilotError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordedSite {
    /// Url the driver starts on; must be one of the recorded pages.
    pub start: String,
    pub pages: HashMap<String, FixturePage>,
}

impl RecordedSite {
    pub fn load(path: &Path) -> Result<Self, SitepilotError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            SitepilotError::Replay(format!("{}: {err}", path.display()))
        })?;
        let site: RecordedSite = serde_json::from_str(&raw)
            .map_err(|err| SitepilotError::Replay(format!("{}: {err}", path.display())))?;
        if !site.pages.contains_key(&site.start) {
            return Err(SitepilotError::Replay(format!(
                "start url {} has no recorded page",
                site.start
            )));
        }
        debug!("loaded recorded site: {} pages", site.pages.len());
        Ok(site)
    }

    pub fn into_driver(self) -> Arc<dyn PageDriver> {
        Arc::new(FixtureDriver::graph(self.start, self.pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDED: &str = r#"{
        "start": "https://x.test/",
        "pages": {
            "https://x.test/": {
                "title": "Home",
                "elements": [
                    {"id": "nav", "tag": "nav"},
                    {"id": "item", "tag": "li", "parent": "nav"},
                    {"id": "link", "tag": "a", "parent": "item",
                     "text": "Members", "attrs": {"href": "/admin/members"}}
                ]
            }
        }
    }"#;

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        std::fs::write(&path, RECORDED).unwrap();

        let site = RecordedSite::load(&path).unwrap();
        assert_eq!(site.start, "https://x.test/");
        let page = &site.pages["https://x.test/"];
        assert_eq!(page.title.as_deref(), Some("Home"));
        assert_eq!(page.elements.len(), 3);
        // Omitted visibility defaults to visible.
        assert!(page.elements.iter().all(|e| e.visible && e.enabled));
    }

    #[test]
    fn test_unknown_start_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        std::fs::write(&path, r#"{"start": "https://x.test/missing", "pages": {}}"#).unwrap();
        let err = RecordedSite::load(&path).unwrap_err();
        assert!(matches!(err, SitepilotError::Replay(_)));
    }

    #[tokio::test]
    async fn test_into_driver_replays_pages() {
        let site: RecordedSite = serde_json::from_str(RECORDED).unwrap();
        let driver = site.into_driver();
        assert_eq!(driver.current_url().await.unwrap(), "https://x.test/");
        assert_eq!(driver.title().await.unwrap().as_deref(), Some("Home"));
    }
}
