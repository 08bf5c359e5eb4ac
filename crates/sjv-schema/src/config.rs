//! # Validator Configuration
//!
//! Settings shared by compilation and validation, loadable from YAML or
//! JSON. Every field has a default, so an empty document is a valid
//! configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sjv_core::depth::{DepthGuard, DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING};
use thiserror::Error;

use crate::vocabulary::TypeVocabulary;

/// Which type-name table schemas are compiled with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabularyChoice {
    /// `number, string, array, object, true, false, null`.
    #[default]
    Strict,
    /// The strict names plus `boolean` and `integer`.
    Extended,
}

/// Compile and validate settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Maximum container nesting in schemas and documents, at most
    /// [`MAX_DEPTH_CEILING`].
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Type-name table.
    #[serde(default)]
    pub type_vocabulary: VocabularyChoice,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            type_vocabulary: VocabularyChoice::default(),
        }
    }
}

/// Error loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("max_depth {requested} exceeds the ceiling of {ceiling}")]
    MaxDepth { requested: usize, ceiling: usize },
}

impl ValidatorConfig {
    /// Parse a YAML configuration.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Parse a JSON configuration.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Reject settings no guard can honour.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.max_depth > MAX_DEPTH_CEILING {
            return Err(ConfigError::MaxDepth {
                requested: self.max_depth,
                ceiling: MAX_DEPTH_CEILING,
            });
        }
        Ok(())
    }

    /// Load a configuration file. `.json` files are parsed as JSON,
    /// anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// The depth guard for `max_depth`. A limit above the ceiling that
    /// bypassed [`check`](Self::check) is clamped.
    pub fn depth_guard(&self) -> DepthGuard {
        DepthGuard::new(self.max_depth)
    }

    /// The type-name table selected by `type_vocabulary`.
    pub fn vocabulary(&self) -> TypeVocabulary {
        match self.type_vocabulary {
            VocabularyChoice::Strict => TypeVocabulary::strict(),
            VocabularyChoice::Extended => TypeVocabulary::extended(),
        }
    }
}
