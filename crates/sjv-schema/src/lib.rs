//! # sjv-schema — Schema Compilation & Streaming Validation
//!
//! Compiles a JSON Schema document into an immutable constraint tree and
//! validates JSON documents against it in a single forward pass over their
//! tokens. No document tree is ever materialized.
//!
//! ## Pipeline
//!
//! 1. **Type-info extraction** ([`type_info`]) — a look-ahead pass over a
//!    schema node that resolves its `type` (and its members' types) so the
//!    compiler knows which node variant to build.
//! 2. **Compilation** ([`compile`]) — walks each node's keywords once and
//!    fills in a [`ConstraintNode`], recursing into `properties` and
//!    `prefixItems`.
//! 3. **Validation** ([`validate`]) — pairs a document's token stream with
//!    the tree and reports the first failing check as a [`Mismatch`].
//!
//! [`SchemaRegistry`] owns compiled schemas by name for embedding systems
//! that install, replace and drop schemas at runtime.
//!
//! ## Supported Keywords
//!
//! Common: `type`, `const`, `enum`, `default`, and the annotations `title`,
//! `description`, `$comment`, `$schema`, `deprecated`, `readOnly`,
//! `writeOnly`, `example`. Per type: numeric bounds and `multipleOf`;
//! string length, `pattern`, `format` and content annotations; array
//! cardinality, `items`, `contains`, `prefixItems` and `uniqueItems`;
//! object `properties`, `required`, `dependentRequired`, property counts
//! and `additionalProperties`.
//!
//! References (`$ref`) and the boolean composition keywords are not
//! supported and are skipped like any other unrecognized keyword.
//!
//! ## Crate Policy
//!
//! - Depends only on `sjv-core` internally.
//! - A schema either compiles completely or produces an error; partially
//!   compiled trees are never returned.
//! - Compiled schemas are `Send + Sync` and never mutated by validation.

pub mod compile;
pub mod config;
pub mod error;
pub mod registry;
pub mod scratch;
pub mod sink;
pub mod tree;
pub mod type_info;
pub mod validate;
pub mod vocabulary;

pub use compile::{compile, compile_file, compile_with_sink};
pub use config::{ConfigError, ValidatorConfig, VocabularyChoice};
pub use error::{SchemaError, ValidateError};
pub use registry::SchemaRegistry;
pub use sink::{DiagnosticSink, TracingSink};
pub use tree::{CompiledSchema, ConstraintNode, NodeBody, NodeId};
pub use type_info::TypeInfo;
pub use validate::{Mismatch, Verdict};
pub use vocabulary::{DeclaredType, TypeVocabulary, Variant};
