//! Deterministic in-memory page driver for tests
//!
//! Replays recorded element tables and a url → page graph so scanner,
//! crawler and locator logic can be exercised without a live browser.
//! Probe matching is pure predicate evaluation; timeouts are ignored.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::driver::{ElementRef, PageDriver, SettleWait};
use crate::errors::DriverError;
use crate::probe::Probe;

/// One recorded element. Serializable so recorded sites can be replayed
/// from a document as well as built in code.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FixtureElement {
    pub id: String,
    pub tag: String,
    /// Element id of the structural parent, if any.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Associated `<label>` text.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl FixtureElement {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            visible: true,
            enabled: true,
            ..Default::default()
        }
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    fn accessible_name(&self) -> Option<&str> {
        self.attrs
            .get("aria-label")
            .map(String::as_str)
            .or(self.label.as_deref())
            .or(self.text.as_deref())
    }
}

/// One recorded page.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FixturePage {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub elements: Vec<FixtureElement>,
}

impl FixturePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    pub fn element(mut self, element: FixtureElement) -> Self {
        self.elements.push(element);
        self
    }
}

/// In-memory driver over a url → page graph.
pub struct FixtureDriver {
    pages: Mutex<HashMap<String, FixturePage>>,
    current: Mutex<String>,
    failing: Mutex<HashSet<String>>,
    navigations: Mutex<Vec<String>>,
}

impl FixtureDriver {
    /// Single-page driver starting at `url`.
    pub fn single(url: impl Into<String>, page: FixturePage) -> Self {
        let url = url.into();
        let mut pages = HashMap::new();
        pages.insert(url.clone(), page);
        Self {
            pages: Mutex::new(pages),
            current: Mutex::new(url),
            failing: Mutex::new(HashSet::new()),
            navigations: Mutex::new(Vec::new()),
        }
    }

    /// Multi-page driver; `start` must be one of the recorded urls.
    pub fn graph(start: impl Into<String>, pages: HashMap<String, FixturePage>) -> Self {
        Self {
            pages: Mutex::new(pages),
            current: Mutex::new(start.into()),
            failing: Mutex::new(HashSet::new()),
            navigations: Mutex::new(Vec::new()),
        }
    }

    /// Make `goto(url)` fail, for crawl partial-failure tests.
    pub fn fail_navigation_to(&self, url: impl Into<String>) {
        self.failing.lock().insert(url.into());
    }

    /// Undo `fail_navigation_to`, for recovery tests.
    pub fn restore_navigation_to(&self, url: &str) {
        self.failing.lock().remove(url);
    }

    /// Urls navigated so far, in order.
    pub fn navigation_log(&self) -> Vec<String> {
        self.navigations.lock().clone()
    }

    fn with_current<T>(&self, f: impl FnOnce(&FixturePage) -> T) -> Result<T, DriverError> {
        let url = self.current.lock().clone();
        let pages = self.pages.lock();
        let page = pages
            .get(&url)
            .ok_or_else(|| DriverError::Browser(format!("no fixture page for {url}")))?;
        Ok(f(page))
    }

    fn find(&self, id: &str) -> Result<FixtureElement, DriverError> {
        self.with_current(|page| page.elements.iter().find(|e| e.id == id).cloned())?
            .ok_or_else(|| DriverError::StaleElement(id.to_string()))
    }

    fn is_descendant(page: &FixturePage, id: &str, ancestor: &str) -> bool {
        let mut cursor = Some(id.to_string());
        while let Some(current) = cursor {
            if current == ancestor {
                return id != ancestor;
            }
            cursor = page
                .elements
                .iter()
                .find(|e| e.id == current)
                .and_then(|e| e.parent.clone());
        }
        false
    }

    fn matches(element: &FixtureElement, probe: &Probe) -> bool {
        match probe {
            Probe::Role { role, name } => {
                element.role.as_deref() == Some(role.as_str())
                    && element
                        .accessible_name()
                        .map(|n| contains_ci(n, name))
                        .unwrap_or(false)
            }
            Probe::Text { pattern, exact } => match element.text.as_deref() {
                Some(text) if *exact => text.trim().eq_ignore_ascii_case(pattern.trim()),
                Some(text) => contains_ci(text, pattern),
                None => false,
            },
            Probe::Label { pattern } => element
                .label
                .as_deref()
                .map(|l| contains_ci(l, pattern))
                .unwrap_or(false),
            Probe::Attribute { name, value, exact } => match element.attrs.get(name) {
                Some(actual) if *exact => actual.eq_ignore_ascii_case(value),
                Some(actual) => contains_ci(actual, value),
                None => false,
            },
            Probe::Selector(selector) => selector
                .split(',')
                .any(|simple| matches_simple_selector(element, simple.trim())),
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Minimal CSS matcher: `tag`, `#id`, `.class`, `[attr]`, `[attr=value]`
/// and concatenations of those. No combinators; probe catalogs stay flat.
fn matches_simple_selector(element: &FixtureElement, selector: &str) -> bool {
    if selector.is_empty() {
        return false;
    }
    let mut rest = selector;

    // Leading tag name.
    let tag_end = rest
        .find(['#', '.', '['])
        .unwrap_or(rest.len());
    let tag = &rest[..tag_end];
    if !tag.is_empty() && !element.tag.eq_ignore_ascii_case(tag) {
        return false;
    }
    rest = &rest[tag_end..];

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('#') {
            let end = after.find(['#', '.', '[']).unwrap_or(after.len());
            let id = &after[..end];
            if element.attrs.get("id").map(String::as_str) != Some(id) {
                return false;
            }
            rest = &after[end..];
        } else if let Some(after) = rest.strip_prefix('.') {
            let end = after.find(['#', '.', '[']).unwrap_or(after.len());
            let class = &after[..end];
            let has = element
                .attrs
                .get("class")
                .map(|c| c.split_whitespace().any(|t| t == class))
                .unwrap_or(false);
            if !has {
                return false;
            }
            rest = &after[end..];
        } else if let Some(after) = rest.strip_prefix('[') {
            let end = match after.find(']') {
                Some(end) => end,
                None => return false,
            };
            let body = &after[..end];
            let ok = match body.split_once('=') {
                Some((name, value)) => {
                    let value = value.trim_matches(['"', '\'']);
                    element.attrs.get(name.trim()).map(String::as_str) == Some(value)
                }
                None => element.attrs.contains_key(body.trim()),
            };
            if !ok {
                return false;
            }
            rest = &after[end + 1..];
        } else {
            return false;
        }
    }
    true
}

fn to_ref(element: &FixtureElement) -> ElementRef {
    let mut r = ElementRef::new(element.id.clone(), element.tag.clone());
    if let Some(text) = &element.text {
        r = r.with_text(text.clone());
    }
    r
}

#[async_trait]
impl PageDriver for FixtureDriver {
    async fn goto(&self, url: &str, _wait: SettleWait) -> Result<(), DriverError> {
        self.navigations.lock().push(url.to_string());
        if self.failing.lock().contains(url) {
            return Err(DriverError::NavigationFailed(url.to_string()));
        }
        if !self.pages.lock().contains_key(url) {
            return Err(DriverError::NavigationFailed(format!(
                "no fixture page for {url}"
            )));
        }
        *self.current.lock() = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.current.lock().clone())
    }

    async fn title(&self) -> Result<Option<String>, DriverError> {
        self.with_current(|page| page.title.clone())
    }

    async fn page_html(&self) -> Result<String, DriverError> {
        self.with_current(|page| page.html.clone())
    }

    async fn query(
        &self,
        probe: &Probe,
        _timeout: Duration,
    ) -> Result<Vec<ElementRef>, DriverError> {
        self.with_current(|page| {
            page.elements
                .iter()
                .filter(|e| Self::matches(e, probe))
                .map(to_ref)
                .collect()
        })
    }

    async fn query_within(
        &self,
        scope: &ElementRef,
        probe: &Probe,
        _timeout: Duration,
    ) -> Result<Vec<ElementRef>, DriverError> {
        self.with_current(|page| {
            page.elements
                .iter()
                .filter(|e| Self::is_descendant(page, &e.id, &scope.id))
                .filter(|e| Self::matches(e, probe))
                .map(to_ref)
                .collect()
        })
    }

    async fn is_visible(&self, el: &ElementRef, _timeout: Duration) -> Result<bool, DriverError> {
        Ok(self.find(&el.id)?.visible)
    }

    async fn is_enabled(&self, el: &ElementRef) -> Result<bool, DriverError> {
        Ok(self.find(&el.id)?.enabled)
    }

    async fn click(&self, el: &ElementRef, _timeout: Duration) -> Result<(), DriverError> {
        let element = self.find(&el.id)?;
        if !element.visible {
            return Err(DriverError::InteractionFailed(format!(
                "element {} not visible",
                el.id
            )));
        }
        Ok(())
    }

    async fn fill(
        &self,
        el: &ElementRef,
        _text: &str,
        _timeout: Duration,
    ) -> Result<(), DriverError> {
        let element = self.find(&el.id)?;
        if !element.enabled {
            return Err(DriverError::InteractionFailed(format!(
                "element {} disabled",
                el.id
            )));
        }
        Ok(())
    }

    async fn text_of(&self, el: &ElementRef) -> Result<Option<String>, DriverError> {
        Ok(self.find(&el.id)?.text.map(|t| t.trim().to_string()))
    }

    async fn attr_of(&self, el: &ElementRef, name: &str) -> Result<Option<String>, DriverError> {
        Ok(self.find(&el.id)?.attrs.get(name).cloned())
    }
}
