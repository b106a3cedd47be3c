//! # Validation Errors
//!
//! Construction-time failures for the domain primitive newtypes. Each variant
//! carries the rejected input so that operators can diagnose a bad identity
//! without guesswork.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Principal string is empty.
    #[error("invalid principal: must be non-empty")]
    EmptyPrincipal,

    /// Principal string exceeds the maximum length.
    #[error("invalid principal \"{value}\": {len} bytes exceeds maximum of {max}")]
    PrincipalTooLong {
        /// The rejected input.
        value: String,
        /// Its length in bytes.
        len: usize,
        /// The permitted maximum.
        max: usize,
    },

    /// Principal string contains whitespace or control characters.
    #[error("invalid principal \"{0}\": whitespace and control characters are not permitted")]
    InvalidPrincipal(String),
}
