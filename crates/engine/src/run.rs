// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builder runs: a scheduled builder job seen through typed, replayed streams

use crate::scheduler::{Job, Scheduler};
use arch_adapters::{LogSink, NullLogSink};
use arch_core::{
    AnalyticsReport, ArchitectError, BuilderInfo, BuilderInput, BuilderOutput, ChannelFilter,
    JsonObject, OutboundMessage, OutboundReceiver, ProgressReport, Replay, ReplayReceiver, RunId,
    Target,
};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Options for a single scheduling call
#[derive(Clone, Default)]
pub struct ScheduleOptions {
    /// Receives every log entry of the run (default: discarded)
    pub logger: Option<Arc<dyn LogSink>>,
    /// Target a builder run is performed for; ignored when scheduling a target
    pub target: Option<Target>,
}

impl ScheduleOptions {
    pub fn with_logger(logger: Arc<dyn LogSink>) -> Self {
        Self {
            logger: Some(logger),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }
}

/// Where a run is scheduled from
pub(crate) struct ScheduleContext {
    pub logger: Arc<dyn LogSink>,
    pub workspace_root: PathBuf,
    pub current_directory: PathBuf,
}

impl ScheduleContext {
    pub fn new(
        options: ScheduleOptions,
        workspace_root: PathBuf,
        current_directory: PathBuf,
    ) -> Self {
        Self {
            logger: options.logger.unwrap_or_else(|| Arc::new(NullLogSink)),
            workspace_root,
            current_directory,
        }
    }
}

type SharedOutput = Shared<BoxFuture<'static, Result<BuilderOutput, ArchitectError>>>;

/// Stops the job once the last clone of its run is dropped
struct RunGuard {
    job: Job,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if self.job.request_stop() {
            tracing::debug!(
                name = self.job.name(),
                id = %self.job.id(),
                "run released, stopping job"
            );
        }
    }
}

/// A live handle to one scheduled builder invocation.
///
/// `output` and `progress` replay their most recent value to new
/// subscribers. Clones observe the same run; dropping the last clone stops
/// the job, running its teardowns.
#[derive(Clone)]
pub struct Run {
    id: RunId,
    info: BuilderInfo,
    guard: Arc<RunGuard>,
    output: Replay<Result<BuilderOutput, ArchitectError>>,
    progress: Replay<ProgressReport>,
    analytics: Replay<AnalyticsReport>,
    result: SharedOutput,
}

impl Run {
    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn info(&self) -> &BuilderInfo {
        &self.info
    }

    /// The first output of the run
    pub async fn result(&self) -> Result<BuilderOutput, ArchitectError> {
        self.result.clone().await
    }

    /// Outputs as they arrive; a failed run ends with its error
    pub fn output(&self) -> ReplayReceiver<Result<BuilderOutput, ArchitectError>> {
        self.output.subscribe()
    }

    pub fn progress(&self) -> ReplayReceiver<ProgressReport> {
        self.progress.subscribe()
    }

    pub fn analytics(&self) -> ReplayReceiver<AnalyticsReport> {
        self.analytics.subscribe()
    }

    /// Stop the run and wait for its teardown
    pub async fn stop(&self) -> Result<(), ArchitectError> {
        self.guard.job.stop().await
    }
}

/// Schedule a builder job by name and deliver its Input message.
///
/// Fails with `NotFound` when the name does not resolve to a builder.
pub(crate) async fn schedule_by_name(
    scheduler: &Scheduler,
    name: &str,
    options: JsonObject,
    target: Option<Target>,
    context: ScheduleContext,
) -> Result<Run, ArchitectError> {
    let job = scheduler.schedule(name, Value::Object(options.clone()));
    let description = job.description().await?;
    let info = description
        .info
        .ok_or_else(|| ArchitectError::NotFound(name.to_string()))?;

    let input = BuilderInput {
        id: job.id(),
        info: info.clone(),
        options,
        target,
        workspace_root: context.workspace_root,
        current_directory: context.current_directory,
    };
    let input =
        serde_json::to_value(&input).map_err(|e| ArchitectError::InvalidMessage(e.to_string()))?;

    let events = job.subscribe(ChannelFilter::All);
    let output = Replay::new();
    let progress = Replay::new();
    let analytics = Replay::new();

    let mut first_output = output.subscribe();
    let job_name = name.to_string();
    let result = async move {
        match first_output.recv().await {
            Some(result) => result,
            None => Err(ArchitectError::NoOutput(job_name)),
        }
    }
    .boxed()
    .shared();

    let pump = Pump {
        completion: job.completed().boxed(),
        output: output.clone(),
        progress: progress.clone(),
        analytics: analytics.clone(),
        logger: context.logger,
    };
    tokio::spawn(pump.run(events));

    job.input(input);

    Ok(Run {
        id: job.id(),
        info,
        guard: Arc::new(RunGuard { job }),
        output,
        progress,
        analytics,
        result,
    })
}

pub(crate) async fn schedule_by_target(
    scheduler: &Scheduler,
    target: &Target,
    overrides: JsonObject,
    context: ScheduleContext,
) -> Result<Run, ArchitectError> {
    target.validate()?;
    schedule_by_name(
        scheduler,
        &target.job_name(),
        overrides,
        Some(target.clone()),
        context,
    )
    .await
}

/// Routes a job's outbound stream into the run's typed streams
struct Pump {
    completion: BoxFuture<'static, Result<(), ArchitectError>>,
    output: Replay<Result<BuilderOutput, ArchitectError>>,
    progress: Replay<ProgressReport>,
    analytics: Replay<AnalyticsReport>,
    logger: Arc<dyn LogSink>,
}

impl Pump {
    async fn run(self, mut events: OutboundReceiver) {
        while let Some(message) = events.recv().await {
            match message {
                OutboundMessage::Output(value) => {
                    let decoded = serde_json::from_value::<BuilderOutput>(value).map_err(|e| {
                        ArchitectError::builder_runtime(format!("invalid builder output: {e}"))
                    });
                    self.output.publish(decoded);
                }
                OutboundMessage::Progress(report) => self.progress.publish(report),
                OutboundMessage::Log(entry) => self.logger.log(&entry),
                OutboundMessage::Analytics(report) => self.analytics.publish(report),
            }
        }

        if let Err(e) = self.completion.await {
            self.output.publish(Err(e));
        }
        self.output.close();
        self.progress.close();
        self.analytics.close();
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
