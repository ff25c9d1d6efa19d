// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builder adapter: turns a builder function into a job handler

use crate::context::{BuilderContext, JobScope};
use crate::job::{JobContext, JobHandler, JobResult};
use crate::scheduler::Scheduler;
use crate::validate::validate_options;
use arch_adapters::SchemaRegistry;
use arch_core::{
    merge_options, ArchitectConfig, ArchitectError, BuilderInfo, BuilderInput, BuilderOutput,
    InboundMessage, JobDescription, JsonObject, OutboundBus, OutboundMessage, Target,
};
use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{self, BoxStream, FuturesUnordered, Stream, StreamExt};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Outputs of one builder invocation, possibly unbounded
pub type OutputStream = BoxStream<'static, Result<BuilderOutput, ArchitectError>>;

/// What a builder function may return.
pub enum BuilderOutputLike {
    Value(BuilderOutput),
    Future(BoxFuture<'static, Result<BuilderOutput, ArchitectError>>),
    /// Consumed lazily; stopping the job ends consumption
    Stream(OutputStream),
}

impl BuilderOutputLike {
    pub fn future<F>(future: F) -> Self
    where
        F: Future<Output = Result<BuilderOutput, ArchitectError>> + Send + 'static,
    {
        Self::Future(future.boxed())
    }

    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<BuilderOutput, ArchitectError>> + Send + 'static,
    {
        Self::Stream(stream.boxed())
    }

    pub fn into_stream(self) -> OutputStream {
        match self {
            Self::Value(output) => stream::once(future::ready(Ok(output))).boxed(),
            Self::Future(future) => future.into_stream().boxed(),
            Self::Stream(stream) => stream,
        }
    }
}

impl From<BuilderOutput> for BuilderOutputLike {
    fn from(output: BuilderOutput) -> Self {
        Self::Value(output)
    }
}

/// A builder function.
///
/// An `Err` from `call` means the builder failed before producing a
/// value; the run fails with `BuilderRuntime`.
pub trait BuilderFn: Send + Sync + 'static {
    fn call(
        &self,
        options: JsonObject,
        context: BuilderContext,
    ) -> Result<BuilderOutputLike, ArchitectError>;
}

impl<F> BuilderFn for F
where
    F: Fn(JsonObject, BuilderContext) -> Result<BuilderOutputLike, ArchitectError>
        + Send
        + Sync
        + 'static,
{
    fn call(
        &self,
        options: JsonObject,
        context: BuilderContext,
    ) -> Result<BuilderOutputLike, ArchitectError> {
        self(options, context)
    }
}

/// A loadable builder implementation
#[derive(Clone)]
pub struct Builder {
    f: Arc<dyn BuilderFn>,
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder").finish_non_exhaustive()
    }
}

/// Wrap a builder function.
///
/// The function is invoked once per Input with the merged, validated
/// options. It may return a single output, a future or a stream of them.
pub fn create_builder<F>(f: F) -> Builder
where
    F: Fn(JsonObject, BuilderContext) -> Result<BuilderOutputLike, ArchitectError>
        + Send
        + Sync
        + 'static,
{
    Builder { f: Arc::new(f) }
}

/// Job handler running one builder.
///
/// Bound to a target when resolved through the target registry, in which
/// case `base_options` are the target's configured options.
pub(crate) struct BuilderJobHandler {
    builder: Builder,
    info: BuilderInfo,
    description: JobDescription,
    base_options: JsonObject,
    target: Option<Target>,
    schemas: Arc<dyn SchemaRegistry>,
    config: ArchitectConfig,
}

impl BuilderJobHandler {
    pub(crate) fn new(
        builder: Builder,
        info: BuilderInfo,
        base_options: JsonObject,
        target: Option<Target>,
        schemas: Arc<dyn SchemaRegistry>,
        config: ArchitectConfig,
    ) -> Self {
        Self {
            description: JobDescription::for_builder(&info, target.as_ref()),
            builder,
            info,
            base_options,
            target,
            schemas,
            config,
        }
    }

    async fn build(
        &self,
        input: Value,
        outbound: OutboundBus,
        scheduler: Scheduler,
        scope: Arc<JobScope>,
    ) -> JobResult {
        let mut input: BuilderInput = serde_json::from_value(input)
            .map_err(|e| ArchitectError::InvalidMessage(e.to_string()))?;
        if input.target.is_none() {
            input.target = self.target.clone();
        }

        let mut options = merge_options(&self.base_options, &input.options);
        if self.config.validate_options {
            options = validate_options(self.schemas.as_ref(), &self.info.option_schema, options)
                .await?;
        }

        let context = BuilderContext::new(input, outbound.clone(), scheduler, scope, &self.config);
        context.begin();
        tracing::debug!(builder = %self.info.builder_name, "invoking builder");

        let mut outputs = self
            .builder
            .f
            .call(options, context.clone())
            .map_err(as_runtime)?
            .into_stream();
        while let Some(output) = outputs.next().await {
            let mut output = output.map_err(as_runtime)?;
            context.finish();
            if let Some(target) = context.target() {
                output.target = Some(target.clone());
            }
            let value = serde_json::to_value(&output)
                .map_err(|e| ArchitectError::InvalidMessage(e.to_string()))?;
            outbound.publish(OutboundMessage::Output(value));
        }
        Ok(())
    }
}

fn as_runtime(err: ArchitectError) -> ArchitectError {
    match err {
        ArchitectError::BuilderRuntime(_) => err,
        other => ArchitectError::builder_runtime(other),
    }
}

#[async_trait]
impl JobHandler for BuilderJobHandler {
    fn description(&self) -> &JobDescription {
        &self.description
    }

    async fn run(&self, _argument: Value, mut context: JobContext) -> JobResult {
        let scope = Arc::new(JobScope::default());
        let outbound = context.outbound().clone();
        let scheduler = context.scheduler().clone();
        let mut builds: FuturesUnordered<BoxFuture<'_, JobResult>> = FuturesUnordered::new();
        let mut listening = true;

        // The first build to finish ends the job
        let result = loop {
            tokio::select! {
                message = context.next_message(), if listening => match message {
                    Some(InboundMessage::Stop) => {
                        tracing::debug!("stop requested");
                        break scope.tear_down().await;
                    }
                    Some(InboundMessage::Input(input)) => builds.push(
                        self.build(input, outbound.clone(), scheduler.clone(), Arc::clone(&scope))
                            .boxed(),
                    ),
                    None => listening = false,
                },
                Some(result) = builds.next(), if !builds.is_empty() => break result,
                else => break Ok(()),
            }
        };

        scope.abort_bridges();
        result
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
