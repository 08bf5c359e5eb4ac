//! # Schema Registry
//!
//! Owns installed schemas by name. Installing compiles first and only
//! replaces the stored schema once compilation succeeds, so a schema is
//! either fully compiled or not installed at all, and a failed recompile
//! leaves the previous version serving validations.
//!
//! Lookups hand out `Arc<CompiledSchema>`: a validation in progress keeps
//! its schema alive even if the name is replaced or removed meanwhile, and
//! the constraint tree is dropped in one step when the last handle goes.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::compile::compile;
use crate::config::ValidatorConfig;
use crate::error::{SchemaError, ValidateError};
use crate::tree::CompiledSchema;
use crate::validate::Verdict;

/// Thread-safe, cloneable map from names to compiled schemas.
///
/// The lock is `parking_lot` and is never held while compiling or
/// validating; it only guards the map itself.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    config: Arc<ValidatorConfig>,
    schemas: Arc<RwLock<HashMap<String, Arc<CompiledSchema>>>>,
}

impl SchemaRegistry {
    /// Create an empty registry compiling with `config`.
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config: Arc::new(config),
            schemas: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The configuration schemas are compiled with.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Compile `text` and install it under `name`.
    ///
    /// Returns the installed schema. On error nothing changes.
    pub fn install(&self, name: &str, text: &str) -> Result<Arc<CompiledSchema>, SchemaError> {
        let schema = Arc::new(compile(text, &self.config)?);
        let previous = self
            .schemas
            .write()
            .insert(name.to_owned(), Arc::clone(&schema));
        if previous.is_some() {
            tracing::info!(name, nodes = schema.node_count(), "schema replaced");
        } else {
            tracing::info!(name, nodes = schema.node_count(), "schema installed");
        }
        Ok(schema)
    }

    /// The schema installed under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<CompiledSchema>> {
        self.schemas.read().get(name).cloned()
    }

    /// Uninstall `name`, returning the schema if it was installed.
    pub fn remove(&self, name: &str) -> Option<Arc<CompiledSchema>> {
        let removed = self.schemas.write().remove(name);
        if removed.is_some() {
            tracing::info!(name, "schema removed");
        }
        removed
    }

    /// Check if a schema is installed under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.read().contains_key(name)
    }

    /// Installed schema names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of installed schemas.
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate `document` against the schema installed under `name`.
    pub fn validate(&self, name: &str, document: &str) -> Result<Verdict, ValidateError> {
        let schema = self.get(name).ok_or_else(|| ValidateError::UnknownSchema {
            name: name.to_owned(),
        })?;
        schema.validate(document)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}
