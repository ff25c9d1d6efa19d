// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registries resolving builder and target names through the host

use crate::builder::{Builder, BuilderJobHandler};
use crate::cache::ResolutionCaches;
use crate::job::JobHandlerRef;
use crate::registry::JobRegistry;
use arch_adapters::{ArchitectHost, SchemaRegistry};
use arch_core::{is_builder_name, ArchitectConfig, ArchitectError, BuilderInfo, JsonObject, Target};
use async_trait::async_trait;
use std::sync::Arc;

/// Host lookups behind the architect's caches.
#[derive(Clone)]
pub(crate) struct Resolver<H> {
    host: H,
    schemas: Arc<dyn SchemaRegistry>,
    config: ArchitectConfig,
    caches: ResolutionCaches,
}

impl<H: ArchitectHost<Builder = Builder>> Resolver<H> {
    pub(crate) fn new(
        host: H,
        schemas: Arc<dyn SchemaRegistry>,
        config: ArchitectConfig,
        caches: ResolutionCaches,
    ) -> Self {
        Self {
            host,
            schemas,
            config,
            caches,
        }
    }

    pub(crate) fn host(&self) -> &H {
        &self.host
    }

    pub(crate) fn schemas(&self) -> &dyn SchemaRegistry {
        self.schemas.as_ref()
    }

    /// Builder info for `name`, resolved once per name
    pub(crate) async fn builder_info(
        &self,
        name: &str,
    ) -> Result<Option<BuilderInfo>, ArchitectError> {
        let host = self.host.clone();
        let owned = name.to_string();
        self.caches
            .builder_info
            .get_or_resolve(name, move || async move {
                Ok(host.resolve_builder(&owned).await?)
            })
            .await
    }

    /// Handler for a builder scheduled by name, created once per name
    pub(crate) async fn builder_handler(
        &self,
        name: &str,
    ) -> Result<Option<JobHandlerRef>, ArchitectError> {
        let resolver = self.clone();
        let owned = name.to_string();
        self.caches
            .job_handlers
            .get_or_resolve(name, move || async move {
                let Some(info) = resolver.builder_info(&owned).await? else {
                    return Ok(None);
                };
                resolver.create_handler(info, JsonObject::new(), None).await
            })
            .await
    }

    /// Handler bound to `target`, created once per target.
    ///
    /// A target the host declares no builder or options for resolves to
    /// `None`.
    pub(crate) async fn target_handler(
        &self,
        target: &Target,
    ) -> Result<Option<JobHandlerRef>, ArchitectError> {
        let resolver = self.clone();
        let target = target.clone();
        let key = target.job_name();
        self.caches
            .job_handlers
            .get_or_resolve(&key, move || async move {
                let builder_name = resolver.host.get_builder_name_for_target(&target).await?;
                let options = resolver.host.get_options_for_target(&target).await?;
                let (Some(builder_name), Some(options)) = (builder_name, options) else {
                    tracing::debug!(%target, "target not declared by host");
                    return Ok(None);
                };
                let Some(info) = resolver.builder_info(&builder_name).await? else {
                    return Ok(None);
                };
                resolver.create_handler(info, options, Some(target)).await
            })
            .await
    }

    // Not cached itself: callers hold the job handler cache entry
    async fn create_handler(
        &self,
        info: BuilderInfo,
        base_options: JsonObject,
        target: Option<Target>,
    ) -> Result<Option<JobHandlerRef>, ArchitectError> {
        let Some(builder) = self.host.load_builder(&info).await? else {
            tracing::debug!(builder = %info.builder_name, "host could not load builder");
            return Ok(None);
        };
        let handler = BuilderJobHandler::new(
            builder,
            info,
            base_options,
            target,
            Arc::clone(&self.schemas),
            self.config.clone(),
        );
        Ok(Some(Arc::new(handler)))
    }
}

/// Resolves `package:builder` names
pub(crate) struct BuilderRegistry<H> {
    resolver: Resolver<H>,
}

impl<H> BuilderRegistry<H> {
    pub(crate) fn new(resolver: Resolver<H>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl<H: ArchitectHost<Builder = Builder>> JobRegistry for BuilderRegistry<H> {
    async fn get(&self, name: &str) -> Result<Option<JobHandlerRef>, ArchitectError> {
        // `{project:target}` would match the builder grammar too
        if !is_builder_name(name) || name.starts_with('{') {
            return Ok(None);
        }
        self.resolver.builder_handler(name).await
    }
}

/// Resolves `{project:target[:configuration]}` names
pub(crate) struct TargetRegistry<H> {
    resolver: Resolver<H>,
}

impl<H> TargetRegistry<H> {
    pub(crate) fn new(resolver: Resolver<H>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl<H: ArchitectHost<Builder = Builder>> JobRegistry for TargetRegistry<H> {
    async fn get(&self, name: &str) -> Result<Option<JobHandlerRef>, ArchitectError> {
        match Target::from_job_name(name) {
            Some(target) => self.resolver.target_handler(&target).await,
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "host_registry_tests.rs"]
mod tests;
