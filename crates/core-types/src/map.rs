use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::feature::FeatureHit;
use crate::section::SiteSection;

/// One entry in a navigation menu, possibly with nested children.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuNode {
    /// Stable within one build (section tag + ordinal chain).
    pub id: String,
    pub label: String,
    /// Raw anchor target as found in the markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Normalized site-relative path; `None` excludes the node from crawls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub section: SiteSection,
    /// Nesting depth, root = 0.
    pub level: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<FeatureHit>,
}

impl MenuNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, section: SiteSection) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            href: None,
            path: None,
            section,
            level: 0,
            children: Vec::new(),
            features: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Sibling identity used for dedup during extraction and map merge.
    pub fn dedup_key(&self) -> (String, Option<String>) {
        (self.label.clone(), self.path.clone())
    }

    /// Whether the crawler may follow this node.
    pub fn is_navigable(&self) -> bool {
        self.path.is_some()
    }
}

/// Metadata captured for one crawled page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Absolute URL as navigated.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Provenance of the crawl step that reached the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<SiteSection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<FeatureHit>,
    pub captured_at: DateTime<Utc>,
}

impl PageMetadata {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            section: None,
            features: Vec::new(),
            captured_at: Utc::now(),
        }
    }
}

/// Persisted hierarchical record of an application's menu structure and
/// per-page feature metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteMap {
    /// Origin captured at build time.
    pub base_url: String,
    pub captured_at: DateTime<Utc>,
    #[serde(default)]
    pub sections: BTreeMap<SiteSection, Vec<MenuNode>>,
    #[serde(default)]
    pub pages: Vec<PageMetadata>,
}

impl SiteMap {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            captured_at: Utc::now(),
            sections: BTreeMap::new(),
            pages: Vec::new(),
        }
    }

    /// Add a page capture, keeping the url set unique (first capture wins).
    pub fn push_page(&mut self, page: PageMetadata) {
        if self.pages.iter().any(|p| p.url == page.url) {
            return;
        }
        self.pages.push(page);
    }

    /// Union with a map captured under another role: sections union by
    /// `(label, path)` identity, pages union by url. Entries unique to
    /// either input survive; on collision `self`'s entry wins.
    pub fn merge(&mut self, other: SiteMap) {
        for (section, nodes) in other.sections {
            let target = self.sections.entry(section).or_default();
            merge_nodes(target, nodes);
        }
        for page in other.pages {
            self.push_page(page);
        }
    }

    /// Every node in the map, depth-first, for diagnostics.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[MenuNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        self.sections.values().map(|roots| count(roots)).sum()
    }
}

fn merge_nodes(target: &mut Vec<MenuNode>, incoming: Vec<MenuNode>) {
    for node in incoming {
        let key = node.dedup_key();
        if let Some(existing) = target.iter_mut().find(|n| n.dedup_key() == key) {
            let mut merged = std::mem::take(&mut existing.children);
            merge_nodes(&mut merged, node.children);
            existing.children = merged;
        } else {
            target.push(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FeatureHit, FeatureKind};

    fn node(label: &str, path: Option<&str>) -> MenuNode {
        let mut n = MenuNode::new(format!("main-{label}"), label, SiteSection::Main);
        n.path = path.map(|p| p.to_string());
        n
    }

    #[test]
    fn test_push_page_dedups_by_url() {
        let mut map = SiteMap::new("https://app.example.com");
        map.push_page(PageMetadata::new("https://app.example.com/a"));
        map.push_page(PageMetadata::new("https://app.example.com/a"));
        assert_eq!(map.pages.len(), 1);
    }

    #[test]
    fn test_merge_unions_sections_and_pages() {
        let mut a = SiteMap::new("https://app.example.com");
        a.sections.insert(
            SiteSection::Main,
            vec![node("Members", Some("/admin/members"))],
        );
        a.push_page(PageMetadata::new("https://app.example.com/admin/members"));

        let mut b = SiteMap::new("https://app.example.com");
        b.sections.insert(
            SiteSection::Main,
            vec![
                node("Members", Some("/admin/members")),
                node("Settings", Some("/admin/settings")),
            ],
        );
        b.push_page(PageMetadata::new("https://app.example.com/admin/members"));
        b.push_page(PageMetadata::new("https://app.example.com/admin/settings"));

        a.merge(b);

        let main = &a.sections[&SiteSection::Main];
        assert_eq!(main.len(), 2);
        assert_eq!(a.pages.len(), 2);
    }

    #[test]
    fn test_merge_keeps_nodes_unique_to_either_input() {
        let mut a = SiteMap::new("https://app.example.com");
        a.sections
            .insert(SiteSection::Header, vec![node("Home", Some("/"))]);

        let mut b = SiteMap::new("https://app.example.com");
        b.sections
            .insert(SiteSection::Footer, vec![node("Terms", Some("/terms"))]);

        a.merge(b);
        assert!(a.sections.contains_key(&SiteSection::Header));
        assert!(a.sections.contains_key(&SiteSection::Footer));
    }

    #[test]
    fn test_merge_recurses_into_children() {
        let mut parent_a = node("Admin", Some("/admin"));
        parent_a.children.push(node("Members", Some("/admin/members")));
        let mut a = SiteMap::new("https://app.example.com");
        a.sections.insert(SiteSection::Sidebar, vec![parent_a]);

        let mut parent_b = node("Admin", Some("/admin"));
        parent_b.children.push(node("Roles", Some("/admin/roles")));
        let mut b = SiteMap::new("https://app.example.com");
        b.sections.insert(SiteSection::Sidebar, vec![parent_b]);

        a.merge(b);
        let roots = &a.sections[&SiteSection::Sidebar];
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].children.len(), 2);
    }

    #[test]
    fn test_map_document_roundtrip() {
        let mut map = SiteMap::new("https://app.example.com");
        let mut n = node("Members", Some("/admin/members"));
        n.features
            .push(FeatureHit::new(FeatureKind::Table, "table"));
        map.sections.insert(SiteSection::Main, vec![n]);
        map.push_page(PageMetadata::new("https://app.example.com/admin/members"));

        let json = serde_json::to_string_pretty(&map).unwrap();
        let back: SiteMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
