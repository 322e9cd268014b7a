//! Error types for the site-map subsystem

use thiserror::Error;

/// Map error enumeration
#[derive(Debug, Error)]
pub enum MapError {
    /// No persisted map exists; the navigation helper cannot be built
    #[error("Site map not found: {0}")]
    MapMissing(String),

    /// The build's base url could not be parsed
    #[error("Invalid base url: {0}")]
    InvalidBaseUrl(String),

    /// A menu label sequence did not resolve against the map
    #[error("Menu path not resolved: {0}")]
    MenuPathUnresolved(String),

    /// Navigation landed, but a post-condition did not hold
    #[error("Navigation post-condition failed: {0}")]
    PostconditionFailed(String),

    /// Store I/O failed while saving
    #[error("Store io failure: {0}")]
    StoreIo(#[from] std::io::Error),

    /// Map document could not be encoded
    #[error("Map encode failure: {0}")]
    Encode(#[from] serde_json::Error),

    /// Underlying driver failure surfaced past the crawl's skip policy
    #[error("Driver failure: {0}")]
    Driver(#[from] page_adapter::DriverError),
}
