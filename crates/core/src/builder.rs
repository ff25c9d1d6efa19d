// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builder metadata and builder outputs

use crate::error::ArchitectError;
use crate::options::JsonObject;
use crate::target::Target;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

// Builder name: package:builder
#[allow(clippy::expect_used)]
static BUILDER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^:]+:[^:]+$").expect("constant regex pattern is valid"));

/// Whether `name` has the `package:builder` shape.
pub fn is_builder_name(name: &str) -> bool {
    BUILDER_NAME.is_match(name)
}

pub fn validate_builder_name(name: &str) -> Result<(), ArchitectError> {
    if is_builder_name(name) {
        Ok(())
    } else {
        Err(ArchitectError::NameSyntax(name.to_string()))
    }
}

/// Resolved metadata for a builder.
///
/// `extra` carries host-specific location data (import path, package
/// directory, ...) that the host needs again when loading the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderInfo {
    pub builder_name: String,
    pub description: String,
    pub option_schema: Value,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl BuilderInfo {
    pub fn new(
        builder_name: impl Into<String>,
        description: impl Into<String>,
        option_schema: Value,
    ) -> Self {
        Self {
            builder_name: builder_name.into(),
            description: description.into(),
            option_schema,
            extra: JsonObject::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// One output emitted by a builder.
///
/// A builder that fails gracefully reports `success: false` with an
/// `error` message; that is still an output, not a run failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderOutput {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    #[serde(flatten)]
    pub info: JsonObject,
}

impl BuilderOutput {
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
            target: None,
            info: JsonObject::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            target: None,
            info: JsonObject::new(),
        }
    }

    pub fn with_info(mut self, key: impl Into<String>, value: Value) -> Self {
        self.info.insert(key.into(), value);
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
