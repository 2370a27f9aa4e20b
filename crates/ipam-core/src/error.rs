//! Error types for the IP address pool
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for pool and store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the IP address pool
#[derive(Error, Debug)]
pub enum Error {
    /// Range text is missing or malformed
    #[error("Invalid IP range: {0}")]
    InvalidRange(String),

    /// Range is well-formed but holds more addresses than a registration may create
    #[error("Range too large: {range} exceeds the maximum of {max} addresses")]
    RangeTooLarge {
        /// The parsed range
        range: String,
        /// Configured maximum number of addresses
        max: u64,
    },

    /// No address record exists for the requested IP
    #[error("Could not find address with IP {0}")]
    AddressNotFound(String),

    /// Transition rejected because of the address's current status
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Address store-related errors
    #[error("Address store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid range error
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    /// Create a "range too large" error
    pub fn range_too_large(range: impl Into<String>, max: u64) -> Self {
        Self::RangeTooLarge {
            range: range.into(),
            max,
        }
    }

    /// Create an "address not found" error for the given IP
    pub fn not_found(ip: impl Into<String>) -> Self {
        Self::AddressNotFound(ip.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an address store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for [`Error::InvalidRange`]
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, Self::InvalidRange(_))
    }

    /// True for [`Error::RangeTooLarge`]
    pub fn is_range_too_large(&self) -> bool {
        matches!(self, Self::RangeTooLarge { .. })
    }

    /// True for [`Error::AddressNotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AddressNotFound(_))
    }

    /// True for [`Error::Conflict`]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
