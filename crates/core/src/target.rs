// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Targets: project-scoped references to a configured builder invocation

use crate::error::ArchitectError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

// Bracketed target job name: {project:target[:configuration]}
#[allow(clippy::expect_used)]
static TARGET_JOB_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{([^:]+):([^:]+)(?::([^:]*))?\}$").expect("constant regex pattern is valid")
});

/// A target in the workspace.
///
/// Two targets are the same identity iff all three fields match. The
/// canonical string form `project:target[:configuration]` is used as a
/// cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub project: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
}

impl Target {
    pub fn new(project: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            target: target.into(),
            configuration: None,
        }
    }

    pub fn with_configuration(mut self, configuration: impl Into<String>) -> Self {
        self.configuration = Some(configuration.into());
        self
    }

    /// Check that the target survives its string form: project and target
    /// are non-empty and no field contains `:`.
    pub fn validate(&self) -> Result<(), ArchitectError> {
        let configuration = self.configuration.as_deref().unwrap_or_default();
        let malformed = self.project.is_empty()
            || self.target.is_empty()
            || [self.project.as_str(), self.target.as_str(), configuration]
                .iter()
                .any(|field| field.contains(':'));
        if malformed {
            return Err(ArchitectError::InvalidTarget(self.to_string()));
        }
        Ok(())
    }

    /// Job name a target is scheduled under: `{project:target[:configuration]}`.
    pub fn job_name(&self) -> String {
        format!("{{{self}}}")
    }

    /// Parse a bracketed job name back into a target.
    ///
    /// Returns `None` for anything that isn't target-shaped.
    pub fn from_job_name(name: &str) -> Option<Self> {
        let captures = TARGET_JOB_NAME.captures(name)?;
        Some(Self {
            project: captures.get(1)?.as_str().to_string(),
            target: captures.get(2)?.as_str().to_string(),
            configuration: captures.get(3).map(|m| m.as_str().to_string()),
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.project, self.target)?;
        if let Some(configuration) = &self.configuration {
            write!(f, ":{configuration}")?;
        }
        Ok(())
    }
}

impl FromStr for Target {
    type Err = ArchitectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let target = match parts.as_slice() {
            [project, target] => Self::new(*project, *target),
            [project, target, configuration] => {
                Self::new(*project, *target).with_configuration(*configuration)
            }
            _ => return Err(ArchitectError::InvalidTarget(s.to_string())),
        };
        target.validate()?;
        Ok(target)
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
