//! # Error Types
//!
//! Errors raised below the schema layer. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// The token stream is malformed or ended early.
///
/// Always fatal: neither compilation nor validation attempts to recover
/// from a structural error in its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed JSON at byte {offset}: {reason}")]
pub struct ParseError {
    /// Byte offset into the input where the problem was detected.
    pub offset: usize,
    /// Short description of what was expected or found.
    pub reason: &'static str,
}

impl ParseError {
    /// Construct a parse error at `offset`.
    pub fn new(offset: usize, reason: &'static str) -> Self {
        Self { offset, reason }
    }

    /// The input ended while a value was still open.
    pub fn unexpected_end(offset: usize) -> Self {
        Self::new(offset, "unexpected end of input")
    }
}

/// Recursion went deeper than the configured nesting budget.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("nesting depth exceeds the configured limit of {limit}")]
pub struct DepthLimitExceeded {
    /// The configured limit that was exceeded.
    pub limit: usize,
}

/// Error while producing a canonical form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    /// The value being canonicalized was malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The value nests deeper than the depth guard allows.
    #[error(transparent)]
    Depth(#[from] DepthLimitExceeded),
}
