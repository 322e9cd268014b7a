use serde::{Deserialize, Serialize};

/// Coarse semantic classification of an on-page widget.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureKind {
    Form,
    Table,
    List,
    Modal,
    Card,
    Chart,
    Stats,
    Filter,
    Search,
    ButtonGroup,
}

impl FeatureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Form => "form",
            FeatureKind::Table => "table",
            FeatureKind::List => "list",
            FeatureKind::Modal => "modal",
            FeatureKind::Card => "card",
            FeatureKind::Chart => "chart",
            FeatureKind::Stats => "stats",
            FeatureKind::Filter => "filter",
            FeatureKind::Search => "search",
            FeatureKind::ButtonGroup => "button-group",
        }
    }
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected widget: what it is and where the detector found it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureHit {
    pub kind: FeatureKind,
    /// Probe selector that matched.
    pub selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FeatureHit {
    pub fn new(kind: FeatureKind, selector: impl Into<String>) -> Self {
        Self {
            kind,
            selector: selector.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
