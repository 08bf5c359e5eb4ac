//! # Error Types
//!
//! Compile-time and validate-time errors. Compilation aborts on the first
//! error anywhere in the schema; validation aborts only on structural
//! problems, because a document that does not match is reported as a
//! [`Verdict`](crate::validate::Verdict), not an error.

use sjv_core::{CanonicalError, DepthLimitExceeded, ParseError};
use thiserror::Error;

/// Error while compiling a schema document.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema text is not well-formed JSON.
    #[error("schema is not valid JSON: {0}")]
    Parse(#[from] ParseError),

    /// A recognized keyword holds a value of the wrong kind or range.
    #[error("invalid value for keyword '{keyword}'")]
    InvalidKeywordValue {
        /// The offending keyword.
        keyword: String,
    },

    /// A schema node has no `type` declaration, or is not an object.
    #[error("schema node has no 'type' declaration")]
    MissingType,

    /// The schema nests deeper than the configured limit.
    #[error("schema nesting exceeds the depth limit of {limit}")]
    StackOverflowGuard {
        /// The configured limit.
        limit: usize,
    },

    /// The schema file could not be read.
    #[error("failed to read schema: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    /// Construct an invalid-keyword error.
    pub fn invalid(keyword: impl Into<String>) -> Self {
        Self::InvalidKeywordValue {
            keyword: keyword.into(),
        }
    }

    /// The keyword at fault, for [`SchemaError::InvalidKeywordValue`].
    pub fn keyword(&self) -> Option<&str> {
        match self {
            Self::InvalidKeywordValue { keyword } => Some(keyword),
            _ => None,
        }
    }
}

impl From<DepthLimitExceeded> for SchemaError {
    fn from(err: DepthLimitExceeded) -> Self {
        Self::StackOverflowGuard { limit: err.limit }
    }
}

impl From<CanonicalError> for SchemaError {
    fn from(err: CanonicalError) -> Self {
        match err {
            CanonicalError::Parse(e) => Self::Parse(e),
            CanonicalError::Depth(e) => e.into(),
        }
    }
}

/// Error while validating a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidateError {
    /// The document is not well-formed JSON.
    #[error("document is not valid JSON: {0}")]
    Parse(#[from] ParseError),

    /// The document nests deeper than the configured limit.
    #[error("document nesting exceeds the depth limit of {limit}")]
    StackOverflowGuard {
        /// The configured limit.
        limit: usize,
    },

    /// No schema is installed under the requested name.
    #[error("no schema installed under '{name}'")]
    UnknownSchema {
        /// The requested name.
        name: String,
    },
}

impl From<DepthLimitExceeded> for ValidateError {
    fn from(err: DepthLimitExceeded) -> Self {
        Self::StackOverflowGuard { limit: err.limit }
    }
}

impl From<CanonicalError> for ValidateError {
    fn from(err: CanonicalError) -> Self {
        match err {
            CanonicalError::Parse(e) => Self::Parse(e),
            CanonicalError::Depth(e) => e.into(),
        }
    }
}
