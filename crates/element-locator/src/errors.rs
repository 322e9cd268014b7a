//! Error types for the locator engine

use thiserror::Error;

/// Locator error enumeration
#[derive(Debug, Error, Clone)]
pub enum LocatorError {
    /// Description never resolved, retries exhausted
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Interaction on a resolved element failed
    #[error("Interaction failed: {0}")]
    InteractionFailed(String),

    /// Driver-level failure outside the probe fall-through policy
    #[error("Driver error: {0}")]
    Driver(String),
}

impl LocatorError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LocatorError::Driver(_) | LocatorError::InteractionFailed(_)
        )
    }
}
