// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Architect configuration
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! validate_options = true
//! analytics = true
//! log_level = "info"
//! ```

use crate::message::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid architect config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Behavior switches applied to every builder job of an architect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchitectConfig {
    /// Validate merged options against the builder's option schema.
    pub validate_options: bool,
    /// Forward builder analytics reports onto the analytics channel.
    pub analytics: bool,
    /// Minimum level of builder log entries that are published.
    pub log_level: LogLevel,
}

impl ArchitectConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded architect config");
        Ok(config)
    }

    pub fn logs(&self, level: LogLevel) -> bool {
        level >= self.log_level
    }
}

impl Default for ArchitectConfig {
    fn default() -> Self {
        Self {
            validate_options: true,
            analytics: true,
            log_level: LogLevel::Info,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
