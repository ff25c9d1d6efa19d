// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Architect facade: schedules builders and targets against one host

use crate::builder::Builder;
use crate::cache::ResolutionCaches;
use crate::host_registry::{BuilderRegistry, Resolver, TargetRegistry};
use crate::internal::internal_registry;
use crate::registry::{FallbackRegistry, JobRegistry};
use crate::run::{self, Run, ScheduleContext, ScheduleOptions};
use crate::scheduler::Scheduler;
use arch_adapters::{ArchitectHost, SchemaRegistry};
use arch_core::{validate_builder_name, ArchitectConfig, ArchitectError, JsonObject, Target};
use std::sync::Arc;

/// Entry point for scheduling builders and targets.
///
/// Owns the registry chain, the scheduler and the two resolution caches.
/// Clones share all of them.
#[derive(Clone)]
pub struct Architect<H> {
    host: H,
    scheduler: Scheduler,
    caches: ResolutionCaches,
    config: ArchitectConfig,
}

impl<H: ArchitectHost<Builder = Builder>> Architect<H> {
    pub fn new(host: H, schemas: Arc<dyn SchemaRegistry>) -> Self {
        Self::with_config(host, schemas, ArchitectConfig::default())
    }

    pub fn with_config(host: H, schemas: Arc<dyn SchemaRegistry>, config: ArchitectConfig) -> Self {
        Self::compose(host, schemas, config, Vec::new())
    }

    /// Build an architect whose registry chain ends with `additional`.
    ///
    /// Resolution order: internal jobs, targets, builders, then each
    /// additional registry in order.
    pub fn compose(
        host: H,
        schemas: Arc<dyn SchemaRegistry>,
        config: ArchitectConfig,
        additional: Vec<Arc<dyn JobRegistry>>,
    ) -> Self {
        let caches = ResolutionCaches::default();
        let resolver = Resolver::new(host.clone(), schemas, config.clone(), caches.clone());

        let mut registries: Vec<Arc<dyn JobRegistry>> = vec![
            Arc::new(internal_registry(resolver.clone())),
            Arc::new(TargetRegistry::new(resolver.clone())),
            Arc::new(BuilderRegistry::new(resolver)),
        ];
        registries.extend(additional);
        let scheduler = Scheduler::new(Arc::new(FallbackRegistry::new(registries)));

        Self {
            host,
            scheduler,
            caches,
            config,
        }
    }

    /// Schedule a builder by `package:builder` name.
    ///
    /// Fails with `NameSyntax` before any resolution when the name is
    /// malformed, and with `NotFound` when the host does not know it.
    pub async fn schedule_builder(
        &self,
        name: &str,
        options: JsonObject,
        schedule: ScheduleOptions,
    ) -> Result<Run, ArchitectError> {
        validate_builder_name(name)?;
        let target = schedule.target.clone();
        let run =
            run::schedule_by_name(&self.scheduler, name, options, target, self.context(schedule))
                .await?;
        tracing::info!(builder = name, id = %run.id(), "scheduled builder");
        Ok(run)
    }

    /// Schedule a target, with `overrides` taking precedence over the
    /// target's configured options
    pub async fn schedule_target(
        &self,
        target: &Target,
        overrides: JsonObject,
        schedule: ScheduleOptions,
    ) -> Result<Run, ArchitectError> {
        let run =
            run::schedule_by_target(&self.scheduler, target, overrides, self.context(schedule))
                .await?;
        tracing::info!(%target, id = %run.id(), "scheduled target");
        Ok(run)
    }

    /// Whether `name` (a builder name, bracketed target or internal job)
    /// resolves. A failing host lookup counts as unresolvable.
    pub async fn has(&self, name: &str) -> bool {
        match self.scheduler.has(name).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(name, error = %e, "resolution failed");
                false
            }
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn caches(&self) -> &ResolutionCaches {
        &self.caches
    }

    pub fn config(&self) -> &ArchitectConfig {
        &self.config
    }

    fn context(&self, options: ScheduleOptions) -> ScheduleContext {
        ScheduleContext::new(
            options,
            self.host.workspace_root(),
            self.host.current_directory(),
        )
    }
}

#[cfg(test)]
#[path = "architect_tests.rs"]
mod tests;
