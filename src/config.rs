//! Configuration loading with environment overrides
//!
//! Precedence, lowest to highest: built-in defaults, an optional JSON
//! config document, `SITEPILOT_*` environment variables.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ai_locator::EscalationConfig;
use site_mapper::BuilderConfig;
use sitepilot_core_types::SiteSection;

use crate::errors::SitepilotError;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SitepilotConfig {
    /// Origin the map build is anchored to.
    pub base_url: String,
    /// Where the site map document lives.
    pub map_path: PathBuf,
    /// Crawl depth bound.
    pub max_depth: u32,
    pub same_origin_only: bool,
    /// Sections scanned during a build, in order.
    pub sections: Vec<SiteSection>,
    pub escalation: EscalationSettings,
}

impl Default for SitepilotConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            map_path: PathBuf::from("site-map.json"),
            max_depth: 2,
            same_origin_only: true,
            sections: SiteSection::all().to_vec(),
            escalation: EscalationSettings::default(),
        }
    }
}

/// AI escalation settings. No api key means escalation stays off.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationSettings {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub model: Option<String>,
    pub enabled: Option<bool>,
}

impl SitepilotConfig {
    /// Defaults, then the document at `path` (when given), then env.
    pub fn resolve(path: Option<&Path>) -> Result<Self, SitepilotError> {
        let mut config = match path {
            Some(path) => Self::from_document(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn from_document(path: &Path) -> Result<Self, SitepilotError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            SitepilotError::Config(format!("{}: {err}", path.display()))
        })?;
        serde_json::from_str(&raw)
            .map_err(|err| SitepilotError::Config(format!("{}: {err}", path.display())))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = env::var("SITEPILOT_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(path) = env::var("SITEPILOT_MAP_PATH") {
            self.map_path = PathBuf::from(path);
        }
        if let Ok(depth) = env::var("SITEPILOT_MAX_DEPTH") {
            if let Ok(depth) = depth.parse() {
                self.max_depth = depth;
            }
        }
        if let Ok(flag) = env::var("SITEPILOT_SAME_ORIGIN_ONLY") {
            self.same_origin_only = flag != "0" && !flag.eq_ignore_ascii_case("false");
        }
        if let Ok(key) = env::var("SITEPILOT_AI_KEY") {
            self.escalation.api_key = Some(key);
        }
        if let Ok(base) = env::var("SITEPILOT_AI_BASE") {
            self.escalation.api_base = Some(base);
        }
        if let Ok(model) = env::var("SITEPILOT_AI_MODEL") {
            self.escalation.model = Some(model);
        }
        if let Ok(flag) = env::var("SITEPILOT_AI_ENABLED") {
            self.escalation.enabled = Some(flag != "0" && !flag.eq_ignore_ascii_case("false"));
        }
    }

    /// Builder knobs for a map build anchored at `base_url`.
    pub fn builder_config(&self, base_url: impl Into<String>) -> BuilderConfig {
        BuilderConfig {
            base_url: base_url.into(),
            sections: self.sections.clone(),
            max_depth: self.max_depth,
            follow_same_origin_only: self.same_origin_only,
        }
    }

    pub fn escalation_config(&self) -> EscalationConfig {
        let mut config = EscalationConfig {
            api_key: self.escalation.api_key.clone(),
            ..Default::default()
        };
        if let Some(base) = &self.escalation.api_base {
            config.api_base = base.clone();
        }
        if let Some(model) = &self.escalation.model {
            config.model = model.clone();
        }
        if let Some(enabled) = self.escalation.enabled {
            config.enabled = enabled;
        }
        config
    }
}
