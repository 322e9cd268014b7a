//! Core types for the locator engine

use std::time::Duration;

use page_adapter::ElementRef;

/// What the caller wants located.
#[derive(Clone, Debug)]
pub struct LocatorQuery {
    /// Natural-language description ("login button", "이메일 입력").
    pub description: String,
    /// Accessibility role hint; enables the role stage.
    pub role: Option<String>,
    /// Explicit accessible name; defaults to the description.
    pub name: Option<String>,
    /// Per-stage probe budget.
    pub timeout: Duration,
    /// Attempts for the safe click/fill wrappers.
    pub retries: u32,
}

impl LocatorQuery {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            role: None,
            name: None,
            timeout: page_adapter::PROBE_TIMEOUT,
            retries: 3,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Accessible name used by the role stage.
    pub fn effective_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.description)
    }
}

/// Transient scored candidate used only during best-match disambiguation.
#[derive(Clone, Debug)]
pub struct LocatorCandidate {
    pub element: ElementRef,
    pub score: Option<i32>,
}

impl LocatorCandidate {
    pub fn new(element: ElementRef) -> Self {
        Self {
            element,
            score: None,
        }
    }
}

/// Slugified form of a description: lowercase, spaces to hyphens. Matches
/// the id-attribute stage's expectations ("login button" → "login-button").
pub fn slugify(description: &str) -> String {
    description
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Login Button"), "login-button");
        assert_eq!(slugify("  email   field "), "email-field");
    }

    #[test]
    fn test_effective_name_defaults_to_description() {
        let q = LocatorQuery::new("save button");
        assert_eq!(q.effective_name(), "save button");
        let q = q.with_name("Save");
        assert_eq!(q.effective_name(), "Save");
    }
}
