// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced host wrapper for consistent observability

use crate::host::{ArchitectHost, HostError};
use arch_core::{BuilderInfo, JsonObject, Target};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::Instrument;

/// Wrapper that adds tracing to any ArchitectHost
#[derive(Clone)]
pub struct TracedHost<H> {
    inner: H,
}

impl<H> TracedHost<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

#[async_trait]
impl<H: ArchitectHost> ArchitectHost for TracedHost<H> {
    type Builder = H::Builder;

    async fn resolve_builder(&self, name: &str) -> Result<Option<BuilderInfo>, HostError> {
        let span = tracing::info_span!("host.resolve_builder", name);
        async {
            let start = std::time::Instant::now();
            let result = self.inner.resolve_builder(name).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(Some(_)) => tracing::info!(elapsed_ms, "builder resolved"),
                Ok(None) => tracing::warn!(elapsed_ms, "builder not found"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "resolution failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn load_builder(&self, info: &BuilderInfo) -> Result<Option<H::Builder>, HostError> {
        let span = tracing::info_span!("host.load_builder", name = %info.builder_name);
        async {
            let start = std::time::Instant::now();
            let result = self.inner.load_builder(info).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(Some(_)) => tracing::info!(elapsed_ms, "builder loaded"),
                Ok(None) => tracing::warn!(elapsed_ms, "builder not loadable"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "load failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn get_builder_name_for_target(
        &self,
        target: &Target,
    ) -> Result<Option<String>, HostError> {
        let result = self.inner.get_builder_name_for_target(target).await;
        match &result {
            Ok(builder) => tracing::debug!(%target, ?builder, "builder for target"),
            Err(e) => tracing::error!(%target, error = %e, "builder lookup failed"),
        }
        result
    }

    async fn get_options_for_target(
        &self,
        target: &Target,
    ) -> Result<Option<JsonObject>, HostError> {
        let result = self.inner.get_options_for_target(target).await;
        match &result {
            Ok(options) => tracing::debug!(
                %target,
                keys = options.as_ref().map(|o| o.len()),
                "options for target"
            ),
            Err(e) => tracing::error!(%target, error = %e, "options lookup failed"),
        }
        result
    }

    async fn get_project_metadata(&self, project: &str) -> Result<Option<JsonObject>, HostError> {
        let result = self.inner.get_project_metadata(project).await;
        tracing::trace!(project, found = ?result.as_ref().map(Option::is_some).ok(), "project metadata");
        result
    }

    fn current_directory(&self) -> PathBuf {
        self.inner.current_directory()
    }

    fn workspace_root(&self) -> PathBuf {
        self.inner.workspace_root()
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
