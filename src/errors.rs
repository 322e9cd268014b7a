//! Top-level error type for the CLI crate

use thiserror::Error;

use element_locator::LocatorError;
use site_mapper::MapError;

#[derive(Debug, Error)]
pub enum SitepilotError {
    /// Configuration document or env override could not be used
    #[error("Config error: {0}")]
    Config(String),

    /// A recorded site document is missing or malformed
    #[error("Recorded site error: {0}")]
    Replay(String),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error("Io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encode failure: {0}")]
    Encode(#[from] serde_json::Error),
}
