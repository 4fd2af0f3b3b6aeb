// src/config.rs

//! Conversion configuration
//!
//! Loaded from a TOML file or built from CLI flags; every field has a
//! default so an empty file is valid.

use crate::error::{Error, Result};
use crate::nodetype::DEFAULT_CONTAINER_TYPE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What to do when converting one top-level package fails
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Abort the whole run on the first failure (default)
    #[default]
    Abort,
    /// Log the failure and continue with the remaining packages
    Continue,
}

/// Settings for one conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Directory deployed artifacts and the manifest are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Container node type used when no descriptor declares one
    #[serde(default = "default_node_type")]
    pub default_node_type: String,

    /// Failure handling across top-level packages
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Run mode the synthesized initialization script is filed under
    #[serde(default)]
    pub run_mode: Option<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_node_type() -> String {
    DEFAULT_CONTAINER_TYPE.to_string()
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_node_type: default_node_type(),
            failure_policy: FailurePolicy::default(),
            run_mode: None,
        }
    }
}

impl ConvertConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("Cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&raw)
            .map_err(|e| Error::ConfigError(format!("Invalid config {}: {}", path.display(), e)))
    }
}
