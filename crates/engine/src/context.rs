// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The context a builder function runs with

use crate::internal;
use crate::logger::BuilderLogger;
use crate::run::{self, Run, ScheduleContext, ScheduleOptions};
use crate::scheduler::Scheduler;
use arch_core::job::{
    GET_BUILDER_NAME_FOR_TARGET, GET_PROJECT_METADATA, GET_TARGET_OPTIONS, VALIDATE_OPTIONS,
};
use arch_core::{
    validate_builder_name, AnalyticsReport, ArchitectConfig, ArchitectError, BuilderInfo,
    BuilderInput, JsonObject, OutboundBus, OutboundMessage, ProgressReport, ProgressState,
    ProgressTracker, RunId, Target,
};
use futures::future::{join_all, BoxFuture, FutureExt};
use serde_json::json;
use std::fmt::Display;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

type Teardown = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), String>> + Send>;

/// Resources owned by one builder job: teardown callbacks registered by
/// its builder and the tasks bridging nested run progress.
#[derive(Default)]
pub(crate) struct JobScope {
    teardowns: Mutex<Vec<Teardown>>,
    bridges: Mutex<Vec<JoinHandle<()>>>,
}

impl JobScope {
    fn add_teardown(&self, teardown: Teardown) {
        self.teardowns
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(teardown);
    }

    fn track(&self, bridge: JoinHandle<()>) {
        self.bridges
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(bridge);
    }

    /// Run every registered teardown concurrently, each exactly once.
    pub(crate) async fn tear_down(&self) -> Result<(), ArchitectError> {
        let teardowns =
            std::mem::take(&mut *self.teardowns.lock().unwrap_or_else(|e| e.into_inner()));
        tracing::debug!(count = teardowns.len(), "running teardowns");

        let failures: Vec<String> = join_all(teardowns.into_iter().map(|teardown| teardown()))
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ArchitectError::TeardownFailure(failures.join("; ")))
        }
    }

    pub(crate) fn abort_bridges(&self) {
        for bridge in self
            .bridges
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
        {
            bridge.abort();
        }
    }
}

struct ContextInner {
    id: RunId,
    builder: BuilderInfo,
    target: Option<Target>,
    workspace_root: PathBuf,
    current_directory: PathBuf,
    logger: BuilderLogger,
    scheduler: Scheduler,
    outbound: OutboundBus,
    progress: Mutex<ProgressTracker>,
    scope: Arc<JobScope>,
    analytics: bool,
}

/// Handed to a builder function for one invocation.
///
/// Progress, log and analytics reports land on the job's outbound bus.
/// Clones share the same progress state.
#[derive(Clone)]
pub struct BuilderContext {
    inner: Arc<ContextInner>,
}

impl BuilderContext {
    pub(crate) fn new(
        input: BuilderInput,
        outbound: OutboundBus,
        scheduler: Scheduler,
        scope: Arc<JobScope>,
        config: &ArchitectConfig,
    ) -> Self {
        let logger_name = match &input.target {
            Some(target) => target.to_string(),
            None => input.info.builder_name.clone(),
        };
        let logger = BuilderLogger::new(logger_name, outbound.clone(), config.log_level);
        Self {
            inner: Arc::new(ContextInner {
                id: input.id,
                builder: input.info,
                target: input.target,
                workspace_root: input.workspace_root,
                current_directory: input.current_directory,
                logger,
                scheduler,
                outbound,
                progress: Mutex::new(ProgressTracker::new()),
                scope,
                analytics: config.analytics,
            }),
        }
    }

    pub fn id(&self) -> RunId {
        self.inner.id
    }

    pub fn builder(&self) -> &BuilderInfo {
        &self.inner.builder
    }

    pub fn target(&self) -> Option<&Target> {
        self.inner.target.as_ref()
    }

    pub fn workspace_root(&self) -> &Path {
        &self.inner.workspace_root
    }

    pub fn current_directory(&self) -> &Path {
        &self.inner.current_directory
    }

    pub fn logger(&self) -> &BuilderLogger {
        &self.inner.logger
    }

    /// Enter Running from Waiting or Stopped, restarting `current` at 0
    pub fn report_running(&self) {
        self.emit(ProgressTracker::report_running);
    }

    /// Update the status line while Running or Waiting
    pub fn report_status(&self, status: impl Into<String>) {
        let status = status.into();
        self.emit(|tracker| tracker.report_status(status));
    }

    /// Report `current` out of `total`; ignored unless Running
    pub fn report_progress(&self, current: u64, total: Option<u64>, status: Option<&str>) {
        self.emit(|tracker| tracker.report_progress(current, total, status.map(str::to_string)));
    }

    /// Register a callback run when the job is stopped.
    ///
    /// All callbacks run concurrently; any failure fails the stop.
    pub fn add_teardown<F, Fut, E>(&self, teardown: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        self.inner.scope.add_teardown(Box::new(move || {
            async move { teardown().await.map_err(|e| e.to_string()) }.boxed()
        }));
    }

    /// Publish an analytics report, unless analytics are disabled
    pub fn report_analytics(&self, report: AnalyticsReport) {
        if self.inner.analytics {
            self.inner
                .outbound
                .publish(OutboundMessage::Analytics(report));
        }
    }

    /// Schedule a target from inside this builder.
    ///
    /// The nested run's progress is forwarded onto this job's progress
    /// channel until this job ends; the nested run itself is independent.
    /// Awaiting a run of the target currently executing this builder never
    /// completes.
    pub async fn schedule_target(
        &self,
        target: &Target,
        overrides: JsonObject,
        options: ScheduleOptions,
    ) -> Result<Run, ArchitectError> {
        let run = run::schedule_by_target(
            &self.inner.scheduler,
            target,
            overrides,
            self.schedule_context(options),
        )
        .await?;
        self.bridge(&run);
        Ok(run)
    }

    /// Schedule a builder by name from inside this builder.
    ///
    /// Progress is bridged as for [`BuilderContext::schedule_target`].
    pub async fn schedule_builder(
        &self,
        name: &str,
        options: JsonObject,
        schedule: ScheduleOptions,
    ) -> Result<Run, ArchitectError> {
        validate_builder_name(name)?;
        let target = schedule.target.clone();
        let run = run::schedule_by_name(
            &self.inner.scheduler,
            name,
            options,
            target,
            self.schedule_context(schedule),
        )
        .await?;
        self.bridge(&run);
        Ok(run)
    }

    pub async fn get_target_options(&self, target: &Target) -> Result<JsonObject, ArchitectError> {
        internal::request(&self.inner.scheduler, GET_TARGET_OPTIONS, target).await
    }

    pub async fn get_builder_name_for_target(
        &self,
        target: &Target,
    ) -> Result<String, ArchitectError> {
        internal::request(&self.inner.scheduler, GET_BUILDER_NAME_FOR_TARGET, target).await
    }

    pub async fn get_project_metadata(&self, target: &Target) -> Result<JsonObject, ArchitectError> {
        internal::request(&self.inner.scheduler, GET_PROJECT_METADATA, target).await
    }

    /// Validate `options` against the option schema of `builder_name`,
    /// returning them with schema defaults applied
    pub async fn validate_options(
        &self,
        options: JsonObject,
        builder_name: &str,
    ) -> Result<JsonObject, ArchitectError> {
        internal::request(
            &self.inner.scheduler,
            VALIDATE_OPTIONS,
            json!([builder_name, options]),
        )
        .await
    }

    /// Emit the Running state forced before the builder is invoked
    pub(crate) fn begin(&self) {
        self.emit(|tracker| Some(tracker.begin()));
    }

    /// Emit completion progress ahead of an output
    pub(crate) fn finish(&self) {
        let mut tracker = self.inner.progress.lock().unwrap_or_else(|e| e.into_inner());
        for state in tracker.finish() {
            self.publish_progress(state);
        }
    }

    // Publishing under the tracker lock keeps reports in transition order
    fn emit(&self, transition: impl FnOnce(&mut ProgressTracker) -> Option<ProgressState>) {
        let mut tracker = self.inner.progress.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(state) = transition(&mut tracker) {
            self.publish_progress(state);
        }
    }

    fn publish_progress(&self, state: ProgressState) {
        self.inner
            .outbound
            .publish(OutboundMessage::Progress(ProgressReport {
                state,
                id: self.inner.id,
                target: self.inner.target.clone(),
                builder: Some(self.inner.builder.clone()),
            }));
    }

    fn schedule_context(&self, options: ScheduleOptions) -> ScheduleContext {
        ScheduleContext {
            logger: options
                .logger
                .unwrap_or_else(|| Arc::new(self.inner.logger.child(""))),
            workspace_root: self.inner.workspace_root.clone(),
            current_directory: self.inner.current_directory.clone(),
        }
    }

    fn bridge(&self, run: &Run) {
        let mut progress = run.progress();
        let outbound = self.inner.outbound.clone();
        let bridge = tokio::spawn(async move {
            while let Some(report) = progress.recv().await {
                if !outbound.publish(OutboundMessage::Progress(report)) {
                    break;
                }
            }
        });
        self.inner.scope.track(bridge);
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
