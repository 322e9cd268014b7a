//! Closed set of DOM query shapes

use serde::{Deserialize, Serialize};

/// One way of asking the page for elements.
///
/// The set is closed on purpose: every locator stage and scanner pass is
/// expressible with one of these shapes, which keeps fixture replay exact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Probe {
    /// Accessibility role plus accessible name (substring, case-insensitive).
    Role { role: String, name: String },
    /// Visible text content match.
    Text { pattern: String, exact: bool },
    /// Associated `<label>` text match (substring, case-insensitive).
    Label { pattern: String },
    /// Attribute value match; `exact` false means substring.
    Attribute {
        name: String,
        value: String,
        exact: bool,
    },
    /// Raw CSS selector.
    Selector(String),
}

impl Probe {
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Probe::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    pub fn text(pattern: impl Into<String>, exact: bool) -> Self {
        Probe::Text {
            pattern: pattern.into(),
            exact,
        }
    }

    pub fn label(pattern: impl Into<String>) -> Self {
        Probe::Label {
            pattern: pattern.into(),
        }
    }

    pub fn attribute(name: impl Into<String>, value: impl Into<String>, exact: bool) -> Self {
        Probe::Attribute {
            name: name.into(),
            value: value.into(),
            exact,
        }
    }

    pub fn selector(selector: impl Into<String>) -> Self {
        Probe::Selector(selector.into())
    }

    /// Short tag for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Probe::Role { .. } => "role",
            Probe::Text { .. } => "text",
            Probe::Label { .. } => "label",
            Probe::Attribute { .. } => "attribute",
            Probe::Selector(_) => "selector",
        }
    }
}

impl std::fmt::Display for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Probe::Role { role, name } => write!(f, "role:{role}:{name}"),
            Probe::Text { pattern, exact } => write!(f, "text:{pattern}:{exact}"),
            Probe::Label { pattern } => write!(f, "label:{pattern}"),
            Probe::Attribute { name, value, exact } => {
                write!(f, "attr:{name}={value}:{exact}")
            }
            Probe::Selector(sel) => write!(f, "css:{sel}"),
        }
    }
}
