//! # sjv-core — Foundational Types for the Streaming Validator
//!
//! This crate is the leaf of the sjv workspace. It defines the pieces that
//! both schema compilation and document validation are built on, and it
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One token source contract.** Compilation and validation never see a
//!    materialized document tree. They pull [`Token`]s from a [`TokenSource`],
//!    and [`Scanner`] is the byte-slice implementation of that contract.
//!
//! 2. **`CanonicalForm` newtype.** Every structural equality test (`const`,
//!    `enum`, `uniqueItems`) compares [`CanonicalForm`]s or text produced by
//!    [`canonical::write_canonical`]. Raw value text is never compared directly.
//!
//! 3. **Bounded recursion.** Every recursive walk consumes a [`DepthGuard`]
//!    level, turning runaway nesting into [`DepthLimitExceeded`] instead of a
//!    native stack overflow.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sjv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod depth;
pub mod error;
pub mod kind;
pub mod scanner;
pub mod token;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalForm;
pub use depth::{DepthGuard, DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING};
pub use error::{CanonicalError, DepthLimitExceeded, ParseError};
pub use kind::{Kind, KindSet};
pub use scanner::Scanner;
pub use token::{decode_string, parse_number, Token, TokenKind, TokenSource};
