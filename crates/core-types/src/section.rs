use serde::{Deserialize, Serialize};

/// Structural section of a page that can carry navigation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteSection {
    Header,
    Sidebar,
    Footer,
    Main,
}

impl SiteSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteSection::Header => "header",
            SiteSection::Sidebar => "sidebar",
            SiteSection::Footer => "footer",
            SiteSection::Main => "main",
        }
    }

    /// All sections in scan priority order.
    pub fn all() -> [SiteSection; 4] {
        [
            SiteSection::Header,
            SiteSection::Sidebar,
            SiteSection::Main,
            SiteSection::Footer,
        ]
    }
}

impl std::fmt::Display for SiteSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
