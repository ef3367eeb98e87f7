//! Error types for cachelab

use std::fmt;

/// Result type alias for cachelab operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache and simulation operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A configuration input violated its stated constraints, or an
    /// operation that needs a live cache was issued before one was created.
    /// `field` names the offending input.
    InvalidConfiguration {
        /// Name of the input that failed validation
        field: &'static str,
        /// Human-readable description of the violation
        reason: String,
    },
}

impl Error {
    /// Shorthand for building an `InvalidConfiguration` error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    /// The error reported when get/put/stats/simulation is attempted
    /// before any cache has been created.
    pub fn no_cache() -> Self {
        Error::invalid("cache", "no cache has been created yet")
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfiguration { field, reason } => {
                write!(f, "invalid configuration ({}): {}", field, reason)
            }
        }
    }
}

impl std::error::Error for Error {}
