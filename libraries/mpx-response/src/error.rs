//! Error types for frequency-response analysis

use thiserror::Error;

/// Result type for response analysis operations
pub type Result<T> = std::result::Result<T, ResponseError>;

/// Errors that can occur while building filters or analyzing responses
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponseError {
    /// A filter or grid was constructed with out-of-domain parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A frequency, passband or grid selection lies outside the valid domain
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// A value could not be represented as a finite number
    #[error("Numeric domain error: {0}")]
    NumericDomain(String),
}

impl ResponseError {
    pub(crate) fn parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub(crate) fn range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }
}
