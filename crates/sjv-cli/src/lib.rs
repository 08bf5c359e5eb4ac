//! # sjv-cli — Schema Validation Command-Line Interface
//!
//! Compiles a JSON Schema once and validates documents against it.
//!
//! ## Subcommands
//!
//! - `check` — compile a schema and validate one or more documents
//! - `compile` — compile a schema and report its node count or the error
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `sjv-schema`; no validation logic lives here.
//! - Handlers return the process exit code: 0 when everything passed,
//!   1 when a document or schema was rejected.

pub mod check;
pub mod compile;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use sjv_schema::ValidatorConfig;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a YAML or JSON configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the maximum nesting depth for schemas and documents.
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,
}

impl ConfigArgs {
    /// Load the configuration file, if any, and apply command-line overrides.
    pub fn resolve(&self) -> Result<ValidatorConfig> {
        let mut config = match &self.config {
            Some(path) => ValidatorConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ValidatorConfig::default(),
        };
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
            config.check().context("--max-depth")?;
        }
        tracing::debug!(
            max_depth = config.max_depth,
            vocabulary = ?config.type_vocabulary,
            "configuration resolved"
        );
        Ok(config)
    }
}

/// Read a file into a string, naming the file on failure.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
