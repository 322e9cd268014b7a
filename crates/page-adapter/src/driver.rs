//! Async page driver trait

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::DriverError;
use crate::probe::Probe;

/// How long `goto` waits after the load event.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SettleWait {
    /// Return as soon as the document is loaded.
    Load,
    /// Wait for the network to go idle (bounded by the navigation timeout).
    NetworkIdle,
}

/// Opaque handle to a located element.
///
/// The id is only meaningful to the driver that produced it; callers treat
/// it as a token. Tag/text snapshots ride along for scoring without an
/// extra round trip.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementRef {
    pub id: String,
    pub tag: String,
    pub text: Option<String>,
}

impl ElementRef {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Browser automation capability consumed by the mapper and locator.
///
/// All operations are serialized against one page at a time; the trait has
/// no concurrent-use contract. Probe queries that time out return an empty
/// list, never an error.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate and wait for settle.
    async fn goto(&self, url: &str, wait: SettleWait) -> Result<(), DriverError>;

    /// Absolute URL of the current page.
    async fn current_url(&self) -> Result<String, DriverError>;

    /// Document title, if any.
    async fn title(&self) -> Result<Option<String>, DriverError>;

    /// Full page markup.
    async fn page_html(&self) -> Result<String, DriverError>;

    /// Run one probe against the current page.
    async fn query(&self, probe: &Probe, timeout: Duration)
        -> Result<Vec<ElementRef>, DriverError>;

    /// Run one probe scoped to the descendants of `scope`.
    async fn query_within(
        &self,
        scope: &ElementRef,
        probe: &Probe,
        timeout: Duration,
    ) -> Result<Vec<ElementRef>, DriverError>;

    /// Visibility check bounded by `timeout`; a timeout reads as `false`.
    async fn is_visible(&self, el: &ElementRef, timeout: Duration) -> Result<bool, DriverError>;

    async fn is_enabled(&self, el: &ElementRef) -> Result<bool, DriverError>;

    async fn click(&self, el: &ElementRef, timeout: Duration) -> Result<(), DriverError>;

    /// Clear then type into an input-like element.
    async fn fill(&self, el: &ElementRef, text: &str, timeout: Duration)
        -> Result<(), DriverError>;

    /// Trimmed visible text of the element.
    async fn text_of(&self, el: &ElementRef) -> Result<Option<String>, DriverError>;

    async fn attr_of(&self, el: &ElementRef, name: &str) -> Result<Option<String>, DriverError>;
}
