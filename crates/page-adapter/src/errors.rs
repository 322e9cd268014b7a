//! Error types for the page capability boundary

use thiserror::Error;

/// Driver error enumeration
#[derive(Debug, Error, Clone)]
pub enum DriverError {
    /// Navigation could not complete
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Element handle no longer attached to the page
    #[error("Stale element: {0}")]
    StaleElement(String),

    /// Interaction (click/fill) failed on a resolved element
    #[error("Interaction failed: {0}")]
    InteractionFailed(String),

    /// Timeout on a blocking operation other than a probe
    #[error("Driver timeout: {0}")]
    Timeout(String),

    /// Underlying browser transport error
    #[error("Browser error: {0}")]
    Browser(String),
}

impl DriverError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DriverError::Timeout(_) | DriverError::Browser(_) | DriverError::StaleElement(_)
        )
    }
}
