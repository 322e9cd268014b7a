//! SitePilot: site-map discovery and element location for web test
//! automation.
//!
//! The crates under `crates/` carry the actual logic:
//! - `page-adapter`: the browser capability boundary (`PageDriver`)
//! - `site-mapper`: section scanning, feature detection, bounded crawl,
//!   map persistence and the navigation read path
//! - `element-locator`: the heuristic description → element pipeline
//! - `ai-locator`: best-effort AI escalation when heuristics exhaust
//!
//! This crate is glue: configuration, the top-level error type, recorded
//! site replay for offline runs, and the `sitepilot` CLI.

pub mod cli;
pub mod config;
pub mod errors;
pub mod replay;

pub use config::SitepilotConfig;
pub use errors::SitepilotError;
