// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared by every layer of the architect

use thiserror::Error;

/// Errors surfaced by scheduling, resolution and builder execution.
///
/// Cloneable so a single failure can be replayed to every subscriber of a
/// run and shared between callers awaiting the same cached resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchitectError {
    #[error("Job '{0}' cannot be resolved.")]
    NotFound(String),

    #[error(
        "Schema validation failed with the following errors:\n  {}",
        .errors.join("\n  ")
    )]
    SchemaValidation { errors: Vec<String> },

    #[error("invalid builder name '{0}': expected 'package:builder'")]
    NameSyntax(String),

    #[error("invalid target string: {0:?}")]
    InvalidTarget(String),

    #[error("builder failed: {0}")]
    BuilderRuntime(String),

    #[error("teardown failed: {0}")]
    TeardownFailure(String),

    #[error("host error: {0}")]
    Host(String),

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("job '{0}' completed without producing an output")]
    NoOutput(String),
}

impl ArchitectError {
    pub fn schema_validation<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::SchemaValidation {
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn builder_runtime(error: impl std::fmt::Display) -> Self {
        Self::BuilderRuntime(error.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
