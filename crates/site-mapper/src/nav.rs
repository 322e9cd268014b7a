//! Read path over a loaded site map

use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use page_adapter::{PageDriver, Probe, SettleWait, NAVIGATION_TIMEOUT, PROBE_TIMEOUT};
use sitepilot_core_types::{FeatureHit, FeatureKind, SiteMap};

use crate::errors::MapError;
use crate::store::SiteMapStore;

/// Optional post-conditions for `goto_menu_path`.
#[derive(Clone, Debug, Default)]
pub struct GotoExpectation {
    /// Substring the landed URL must contain.
    pub url_contains: Option<String>,
    /// Selector that must be visible after navigation.
    pub visible_selector: Option<String>,
}

/// Resolves menu label sequences against a previously persisted map.
///
/// The map is a required precondition; construction fails fatally when no
/// map exists, since the helper has no discovery path of its own.
#[derive(Debug)]
pub struct NavigationHelper {
    map: SiteMap,
    base: Url,
}

impl NavigationHelper {
    pub fn from_store(store: &SiteMapStore) -> Result<Self, MapError> {
        let map = store.load().ok_or_else(|| {
            MapError::MapMissing(format!(
                "no site map at {}; run a map build first",
                store.path().display()
            ))
        })?;
        Self::from_map(map)
    }

    pub fn from_map(map: SiteMap) -> Result<Self, MapError> {
        let base = Url::parse(&map.base_url)
            .map_err(|err| MapError::InvalidBaseUrl(format!("{}: {err}", map.base_url)))?;
        Ok(Self { map, base })
    }

    pub fn map(&self) -> &SiteMap {
        &self.map
    }

    /// Walk the menu forest matching each label in turn (case-insensitive,
    /// trimmed, exact). `None` when any step misses or the terminal node
    /// has no path.
    pub fn resolve_menu_path(&self, labels: &[&str]) -> Option<String> {
        let (first, rest) = labels.split_first()?;

        let mut node = self
            .map
            .sections
            .values()
            .flatten()
            .find(|n| label_matches(&n.label, first))?;

        for label in rest {
            node = node
                .children
                .iter()
                .find(|n| label_matches(&n.label, label))?;
        }
        node.path.clone()
    }

    /// Try each label sequence in order; first successful resolution wins.
    /// Tolerates localization differences without hard-coding which label
    /// set is present.
    pub fn resolve_menu_path_variants(&self, variants: &[&[&str]]) -> Option<String> {
        for labels in variants {
            if let Some(path) = self.resolve_menu_path(labels) {
                debug!("variant {:?} resolved to {}", labels, path);
                return Some(path);
            }
        }
        None
    }

    /// Resolve, navigate, and check optional post-conditions.
    pub async fn goto_menu_path(
        &self,
        driver: &Arc<dyn PageDriver>,
        labels: &[&str],
        expect: GotoExpectation,
    ) -> Result<(), MapError> {
        let path = self.resolve_menu_path(labels).ok_or_else(|| {
            MapError::MenuPathUnresolved(format!("{labels:?} not present in site map"))
        })?;
        let target = self
            .base
            .join(&path)
            .map_err(|err| MapError::InvalidBaseUrl(format!("{path}: {err}")))?;

        info!("navigating to {} via menu path {:?}", target, labels);
        driver.goto(target.as_str(), SettleWait::NetworkIdle).await?;

        if let Some(fragment) = expect.url_contains {
            let landed = driver.current_url().await?;
            if !landed.contains(&fragment) {
                return Err(MapError::PostconditionFailed(format!(
                    "landed on {landed}, expected url containing '{fragment}'"
                )));
            }
        }
        if let Some(selector) = expect.visible_selector {
            let probe = Probe::selector(selector.clone());
            let matches = driver.query(&probe, NAVIGATION_TIMEOUT).await?;
            let mut visible = false;
            for element in &matches {
                if driver.is_visible(element, PROBE_TIMEOUT).await.unwrap_or(false) {
                    visible = true;
                    break;
                }
            }
            if !visible {
                return Err(MapError::PostconditionFailed(format!(
                    "expected visible '{selector}' after navigating {labels:?}"
                )));
            }
        }
        Ok(())
    }

    /// Feature list for the first captured page whose url contains
    /// `fragment`.
    pub fn page_features_by_path(&self, fragment: &str) -> Option<&[FeatureHit]> {
        self.map
            .pages
            .iter()
            .find(|p| p.url.contains(fragment))
            .map(|p| p.features.as_slice())
    }

    pub fn has_feature(&self, fragment: &str, kind: FeatureKind) -> bool {
        self.page_features_by_path(fragment)
            .map(|features| features.iter().any(|f| f.kind == kind))
            .unwrap_or(false)
    }
}

fn label_matches(candidate: &str, wanted: &str) -> bool {
    candidate.trim().eq_ignore_ascii_case(wanted.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitepilot_core_types::{FeatureHit, MenuNode, PageMetadata, SiteSection};

    fn fixture_map() -> SiteMap {
        let mut map = SiteMap::new("https://app.test");

        let mut members =
            MenuNode::new("main-0", "Members", SiteSection::Main).with_path("/admin/members");
        members.children.push(
            MenuNode::new("main-0-0", "Roles", SiteSection::Main).with_path("/admin/members/roles"),
        );
        let more = MenuNode::new("main-1", "More", SiteSection::Main);
        map.sections.insert(SiteSection::Main, vec![members, more]);

        let mut page = PageMetadata::new("https://app.test/admin/members");
        page.features
            .push(FeatureHit::new(FeatureKind::Table, "table"));
        map.pages.push(page);
        map
    }

    fn helper() -> NavigationHelper {
        NavigationHelper::from_map(fixture_map()).unwrap()
    }

    #[test]
    fn test_resolve_exact_label_sequence() {
        let h = helper();
        assert_eq!(
            h.resolve_menu_path(&["Members"]).as_deref(),
            Some("/admin/members")
        );
        assert_eq!(
            h.resolve_menu_path(&["Members", "Roles"]).as_deref(),
            Some("/admin/members/roles")
        );
    }

    #[test]
    fn test_resolution_is_case_insensitive_and_trimmed() {
        let h = helper();
        assert_eq!(
            h.resolve_menu_path(&[" members "]).as_deref(),
            Some("/admin/members")
        );
    }

    #[test]
    fn test_altered_label_misses() {
        let h = helper();
        assert_eq!(h.resolve_menu_path(&["Member"]), None);
        assert_eq!(h.resolve_menu_path(&["Members", "Role"]), None);
    }

    #[test]
    fn test_pathless_terminal_is_none() {
        let h = helper();
        assert_eq!(h.resolve_menu_path(&["More"]), None);
    }

    #[test]
    fn test_variants_return_first_resolving() {
        let h = helper();
        // Only the second of three variants is present in the map.
        let path = h.resolve_menu_path_variants(&[&["회원"], &["Members"], &["Users"]]);
        assert_eq!(path.as_deref(), Some("/admin/members"));
        assert_eq!(h.resolve_menu_path_variants(&[&["회원"], &["Users"]]), None);
    }

    #[test]
    fn test_feature_lookup_by_url_fragment() {
        let h = helper();
        assert!(h.has_feature("/admin/members", FeatureKind::Table));
        assert!(!h.has_feature("/admin/members", FeatureKind::Chart));
        assert!(!h.has_feature("/unknown", FeatureKind::Table));
    }

    #[test]
    fn test_missing_map_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = SiteMapStore::new(dir.path().join("absent.json"));
        let err = NavigationHelper::from_store(&store).unwrap_err();
        assert!(matches!(err, MapError::MapMissing(_)));
    }
}
