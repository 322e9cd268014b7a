//! Site map construction and read path
//!
//! - `features`: probes the current page for a fixed widget catalog
//! - `scan`: extracts menu trees from one structural section
//! - `builder`: composes scan + detect into a `SiteMap`, with bounded
//!   breadth-first crawling of discovered menu links
//! - `store`: persists the map as one JSON document with an instance cache
//! - `nav`: label-sequence resolution over a loaded map

pub mod builder;
pub mod errors;
pub mod features;
pub mod nav;
pub mod scan;
pub mod store;

pub use builder::{BuilderConfig, SiteMapBuilder};
pub use errors::MapError;
pub use features::FeatureDetector;
pub use nav::{GotoExpectation, NavigationHelper};
pub use scan::SectionScanner;
pub use store::SiteMapStore;
