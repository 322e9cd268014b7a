//! Menu extraction for one structural section

use std::sync::Arc;

use tracing::debug;
use url::Url;

use page_adapter::{ElementRef, PageDriver, Probe, PROBE_TIMEOUT};
use sitepilot_core_types::{normalize_path, MenuNode, SiteSection};

/// Candidate container selectors per section, in priority order. The
/// first visible container wins for its section; candidates are never
/// merged within a section.
fn container_candidates(section: SiteSection) -> &'static [&'static str] {
    match section {
        SiteSection::Header => &[".navbar", ".top-nav", "header", "[role=navigation]", "nav"],
        SiteSection::Sidebar => &[".sidebar", ".side-nav", "[role=complementary]", "aside"],
        SiteSection::Footer => &[".footer", "[role=contentinfo]", "footer"],
        SiteSection::Main => &["[role=main]", ".main-content", "main"],
    }
}

const ITEM_SELECTOR: &str = "li, [role=listitem]";
const TRIGGER_SELECTOR: &str = "a, button, [role=menuitem]";
const NESTED_LIST_SELECTOR: &str = "ul, ol, [role=menu]";

/// Guards against pathological self-referential markup in fixtures.
const MAX_MENU_DEPTH: u32 = 4;

/// Extracts a menu tree from whichever container is first found visible.
pub struct SectionScanner {
    driver: Arc<dyn PageDriver>,
    base: Url,
}

impl SectionScanner {
    pub fn new(driver: Arc<dyn PageDriver>, base: Url) -> Self {
        Self { driver, base }
    }

    /// Scan one section. An absent or empty section yields an empty forest.
    pub async fn scan(&self, section: SiteSection) -> Vec<MenuNode> {
        let container = match self.find_container(section).await {
            Some(container) => container,
            None => {
                debug!("no visible container for section {}", section);
                return Vec::new();
            }
        };

        let items = self.direct_items(&container).await;
        let mut nodes = if items.is_empty() {
            // No list structure: collect triggers as a flat level-0 set.
            let triggers = self.query_in(&container, TRIGGER_SELECTOR).await;
            let mut flat = Vec::new();
            for (index, trigger) in triggers.iter().enumerate() {
                if let Some(node) = self
                    .node_from_trigger(trigger, section, 0, &format!("{section}-{index}"))
                    .await
                {
                    flat.push(node);
                }
            }
            flat
        } else {
            self.nodes_from_items(&items, section, 0, section.as_str())
                .await
        };

        dedup_siblings(&mut nodes);
        nodes
    }

    async fn find_container(&self, section: SiteSection) -> Option<ElementRef> {
        for selector in container_candidates(section) {
            let probe = Probe::selector(*selector);
            let matches = self.driver.query(&probe, PROBE_TIMEOUT).await.ok()?;
            for candidate in matches {
                if self
                    .driver
                    .is_visible(&candidate, PROBE_TIMEOUT)
                    .await
                    .unwrap_or(false)
                {
                    debug!("section {} container: {}", section, selector);
                    return Some(candidate);
                }
            }
        }
        None
    }

    async fn query_in(&self, scope: &ElementRef, selector: &str) -> Vec<ElementRef> {
        self.driver
            .query_within(scope, &Probe::selector(selector), PROBE_TIMEOUT)
            .await
            .unwrap_or_default()
    }

    /// List items of `scope` that are not nested inside another item of
    /// `scope`. Nested items belong to their parent's sub-menu pass.
    async fn direct_items(&self, scope: &ElementRef) -> Vec<ElementRef> {
        let items = self.query_in(scope, ITEM_SELECTOR).await;
        let mut nested_ids = std::collections::HashSet::new();
        for item in &items {
            for sub in self.query_in(item, ITEM_SELECTOR).await {
                nested_ids.insert(sub.id);
            }
        }
        items
            .into_iter()
            .filter(|item| !nested_ids.contains(&item.id))
            .collect()
    }

    /// One node per item's first trigger; nested lists recurse one level
    /// deeper with `level + 1`.
    async fn nodes_from_items(
        &self,
        items: &[ElementRef],
        section: SiteSection,
        level: u32,
        id_prefix: &str,
    ) -> Vec<MenuNode> {
        let mut nodes = Vec::new();
        if level >= MAX_MENU_DEPTH {
            return nodes;
        }

        for (index, item) in items.iter().enumerate() {
            let trigger = match self.query_in(item, TRIGGER_SELECTOR).await.into_iter().next() {
                Some(trigger) => trigger,
                None => continue,
            };
            let id = format!("{id_prefix}-{index}");
            let mut node = match self.node_from_trigger(&trigger, section, level, &id).await {
                Some(node) => node,
                None => continue,
            };

            if let Some(nested) = self.query_in(item, NESTED_LIST_SELECTOR).await.first() {
                let sub_items = self.direct_items(nested).await;
                let mut children =
                    Box::pin(self.nodes_from_items(&sub_items, section, level + 1, &id)).await;
                dedup_siblings(&mut children);
                node.children = children;
            }
            nodes.push(node);
        }
        nodes
    }

    /// Build a node from a trigger element. Unlabelled triggers are skipped.
    async fn node_from_trigger(
        &self,
        trigger: &ElementRef,
        section: SiteSection,
        level: u32,
        id: &str,
    ) -> Option<MenuNode> {
        let label = self.label_of(trigger).await?;
        let href = self
            .driver
            .attr_of(trigger, "href")
            .await
            .ok()
            .flatten();
        let path = href
            .as_deref()
            .and_then(|raw| normalize_path(raw, &self.base));

        let mut node = MenuNode::new(id, label, section);
        node.level = level;
        node.href = href;
        node.path = path;
        Some(node)
    }

    /// Displayed text, else an accessible-name attribute.
    async fn label_of(&self, element: &ElementRef) -> Option<String> {
        if let Ok(Some(text)) = self.driver.text_of(element).await {
            let trimmed = text.trim().to_string();
            if !trimmed.is_empty() {
                return Some(trimmed);
            }
        }
        for attr in ["aria-label", "title"] {
            if let Ok(Some(value)) = self.driver.attr_of(element, attr).await {
                let trimmed = value.trim().to_string();
                if !trimmed.is_empty() {
                    return Some(trimmed);
                }
            }
        }
        None
    }
}

/// Enforce `(label, path)` sibling uniqueness; later duplicates drop.
fn dedup_siblings(nodes: &mut Vec<MenuNode>) {
    let mut seen = std::collections::HashSet::new();
    nodes.retain(|node| seen.insert(node.dedup_key()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_adapter::{FixtureDriver, FixtureElement, FixturePage};

    fn base() -> Url {
        Url::parse("https://app.test").unwrap()
    }

    fn nav_page() -> FixturePage {
        FixturePage::new()
            .element(FixtureElement::new("nav", "nav").attr("class", "navbar"))
            .element(FixtureElement::new("li-1", "li").parent("nav"))
            .element(
                FixtureElement::new("a-1", "a")
                    .parent("li-1")
                    .text("Members")
                    .attr("href", "/admin/members"),
            )
            .element(FixtureElement::new("li-2", "li").parent("nav"))
            .element(
                FixtureElement::new("a-2", "a")
                    .parent("li-2")
                    .text("Settings")
                    .attr("href", "/admin/settings"),
            )
            .element(FixtureElement::new("sub-ul", "ul").parent("li-2"))
            .element(FixtureElement::new("sub-li", "li").parent("sub-ul"))
            .element(
                FixtureElement::new("sub-a", "a")
                    .parent("sub-li")
                    .text("Roles")
                    .attr("href", "/admin/roles"),
            )
    }

    #[tokio::test]
    async fn test_extracts_nested_menu_tree() {
        let driver = Arc::new(FixtureDriver::single("https://app.test/", nav_page()));
        let scanner = SectionScanner::new(driver, base());
        let nodes = scanner.scan(SiteSection::Header).await;

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].label, "Members");
        assert_eq!(nodes[0].path.as_deref(), Some("/admin/members"));
        assert_eq!(nodes[0].level, 0);

        // Settings has one nested child at level 1. The nested trigger is
        // not re-collected as a top-level sibling.
        assert_eq!(nodes[1].children.len(), 1);
        assert_eq!(nodes[1].children[0].label, "Roles");
        assert_eq!(nodes[1].children[0].level, 1);
    }

    #[tokio::test]
    async fn test_first_visible_container_wins() {
        let page = FixturePage::new()
            .element(
                FixtureElement::new("fancy", "div")
                    .attr("class", "navbar")
                    .hidden(),
            )
            .element(FixtureElement::new("plain", "nav"))
            .element(
                FixtureElement::new("a-1", "a")
                    .parent("plain")
                    .text("Home")
                    .attr("href", "/"),
            );
        let driver = Arc::new(FixtureDriver::single("https://app.test/", page));
        let nodes = SectionScanner::new(driver, base())
            .scan(SiteSection::Header)
            .await;
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].label, "Home");
    }

    #[tokio::test]
    async fn test_flat_fallback_without_list_items() {
        let page = FixturePage::new()
            .element(FixtureElement::new("foot", "footer"))
            .element(
                FixtureElement::new("a-1", "a")
                    .parent("foot")
                    .text("Terms")
                    .attr("href", "/terms"),
            )
            .element(
                FixtureElement::new("a-2", "a")
                    .parent("foot")
                    .text("Privacy")
                    .attr("href", "/privacy"),
            );
        let driver = Arc::new(FixtureDriver::single("https://app.test/", page));
        let nodes = SectionScanner::new(driver, base())
            .scan(SiteSection::Footer)
            .await;
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.level == 0));
    }

    #[tokio::test]
    async fn test_unlabelled_and_duplicate_nodes_dropped() {
        let page = FixturePage::new()
            .element(FixtureElement::new("nav", "nav"))
            .element(
                FixtureElement::new("a-1", "a")
                    .parent("nav")
                    .text("Members")
                    .attr("href", "/admin/members"),
            )
            .element(
                FixtureElement::new("a-dup", "a")
                    .parent("nav")
                    .text("Members")
                    .attr("href", "/admin/members"),
            )
            .element(
                // No text and no accessible name: skipped.
                FixtureElement::new("a-blank", "a").parent("nav").attr("href", "/x"),
            );
        let driver = Arc::new(FixtureDriver::single("https://app.test/", page));
        let nodes = SectionScanner::new(driver, base())
            .scan(SiteSection::Header)
            .await;
        assert_eq!(nodes.len(), 1);
    }

    #[tokio::test]
    async fn test_hash_href_yields_pathless_node() {
        let page = FixturePage::new()
            .element(FixtureElement::new("nav", "nav"))
            .element(
                FixtureElement::new("a-1", "a")
                    .parent("nav")
                    .text("More")
                    .attr("href", "#"),
            );
        let driver = Arc::new(FixtureDriver::single("https://app.test/", page));
        let nodes = SectionScanner::new(driver, base())
            .scan(SiteSection::Header)
            .await;
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].path, None);
        assert_eq!(nodes[0].href.as_deref(), Some("#"));
        assert!(!nodes[0].is_navigable());
    }
}
