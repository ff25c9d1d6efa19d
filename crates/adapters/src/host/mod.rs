// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace host adapters

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeHost, FakeTarget, HostCall};

use arch_core::{ArchitectError, BuilderInfo, JsonObject, Target};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from host operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("builder '{name}' could not be loaded: {reason}")]
    LoadFailed { name: String, reason: String },
    #[error("configuration '{configuration}' is not set for target '{target}'")]
    ConfigurationNotFound {
        target: String,
        configuration: String,
    },
    #[error("workspace error: {0}")]
    Workspace(String),
}

impl From<HostError> for ArchitectError {
    fn from(err: HostError) -> Self {
        ArchitectError::Host(err.to_string())
    }
}

/// The workspace host: knows where builders live and what targets declare.
///
/// Lookups return `Ok(None)` for names the workspace doesn't know, and
/// `Err` only when the host itself fails.
#[async_trait]
pub trait ArchitectHost: Clone + Send + Sync + 'static {
    /// Loaded builder implementation handed back to the engine
    type Builder: Clone + Send + Sync + 'static;

    /// Resolve a `package:builder` name to its metadata
    async fn resolve_builder(&self, name: &str) -> Result<Option<BuilderInfo>, HostError>;

    /// Load the implementation behind resolved builder metadata
    async fn load_builder(&self, info: &BuilderInfo)
        -> Result<Option<Self::Builder>, HostError>;

    async fn get_builder_name_for_target(
        &self,
        target: &Target,
    ) -> Result<Option<String>, HostError>;

    /// Options declared for a target, with its configurations applied
    async fn get_options_for_target(&self, target: &Target)
        -> Result<Option<JsonObject>, HostError>;

    async fn get_project_metadata(&self, project: &str) -> Result<Option<JsonObject>, HostError>;

    fn current_directory(&self) -> PathBuf;

    fn workspace_root(&self) -> PathBuf;
}
