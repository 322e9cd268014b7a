//! Shared data model for the site-map and locator subsystems
//!
//! Everything persisted or exchanged between the mapper, the navigation
//! helper and the locator engine lives here:
//! - `SiteSection` / `FeatureKind` classification tags
//! - `MenuNode` menu trees and `PageMetadata` crawl captures
//! - `SiteMap` with multi-role merge semantics
//! - href-to-path normalization shared by scanner and crawler

pub mod feature;
pub mod map;
pub mod path;
pub mod section;

pub use feature::{FeatureHit, FeatureKind};
pub use map::{MenuNode, PageMetadata, SiteMap};
pub use path::normalize_path;
pub use section::SiteSection;
