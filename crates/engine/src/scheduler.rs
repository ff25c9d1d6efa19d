// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler: turns a job name into a live, observable, stoppable job

use crate::job::{JobContext, JobResult};
use crate::registry::JobRegistry;
use arch_core::{
    ArchitectError, ChannelFilter, InboundMessage, JobDescription, OutboundBus, OutboundMessage,
    OutboundReceiver, Replay, ReplayReceiver, RunId, SequentialIdGen,
};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;

type SharedResult<T> = Shared<BoxFuture<'static, Result<T, ArchitectError>>>;

struct SchedulerInner {
    registry: Arc<dyn JobRegistry>,
    ids: SequentialIdGen,
}

/// Schedules jobs resolved through a registry.
///
/// Cloning is cheap; clones share the registry and the id sequence.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
}

impl Scheduler {
    pub fn new(registry: Arc<dyn JobRegistry>) -> Self {
        Self::with_ids(registry, SequentialIdGen::new())
    }

    pub fn with_ids(registry: Arc<dyn JobRegistry>, ids: SequentialIdGen) -> Self {
        Self {
            inner: Arc::new(SchedulerInner { registry, ids }),
        }
    }

    /// Whether `name` resolves to a handler, without starting a job
    pub async fn has(&self, name: &str) -> Result<bool, ArchitectError> {
        Ok(self.inner.registry.get(name).await?.is_some())
    }

    /// Start a job.
    ///
    /// Returns immediately; resolution and execution happen on a spawned
    /// task, so this must be called from within a tokio runtime.
    pub fn schedule(&self, name: &str, argument: Value) -> Job {
        let id = self.inner.ids.next();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (description_tx, description_rx) = oneshot::channel();
        let (completion_tx, completion_rx) = oneshot::channel();
        let outbound = OutboundBus::new();
        let output = Replay::new();

        // Subscribe before the task starts so nothing is missed
        let output_rx = outbound.subscribe(ChannelFilter::Output);
        let mut first_output = output.subscribe();

        let task = JobTask {
            name: name.to_string(),
            id,
            scheduler: self.clone(),
            outbound: outbound.clone(),
            output: output.clone(),
        };
        tokio::spawn(task.run(argument, inbound_rx, output_rx, description_tx, completion_tx));

        let job_name = name.to_string();
        let result = async move {
            match first_output.recv().await {
                Some(result) => result,
                None => Err(ArchitectError::NoOutput(job_name)),
            }
        }
        .boxed()
        .shared();

        Job {
            id,
            name: name.to_string(),
            inbound: inbound_tx,
            outbound,
            output,
            description: dropped_as(description_rx, name),
            completion: dropped_as(completion_rx, name),
            result,
        }
    }
}

// A dropped sender means the job task died before reporting
fn dropped_as<T: Clone + Send + Sync + 'static>(
    rx: oneshot::Receiver<Result<T, ArchitectError>>,
    name: &str,
) -> SharedResult<T> {
    let name = name.to_string();
    rx.map(move |received| {
        received.unwrap_or_else(|_| Err(ArchitectError::NotFound(name)))
    })
    .boxed()
    .shared()
}

struct JobTask {
    name: String,
    id: RunId,
    scheduler: Scheduler,
    outbound: OutboundBus,
    output: Replay<Result<Value, ArchitectError>>,
}

impl JobTask {
    async fn run(
        self,
        argument: Value,
        inbound: mpsc::UnboundedReceiver<InboundMessage>,
        output_rx: OutboundReceiver,
        description_tx: oneshot::Sender<Result<JobDescription, ArchitectError>>,
        completion_tx: oneshot::Sender<JobResult>,
    ) {
        let span = tracing::info_span!("job", name = %self.name, id = %self.id);
        async move {
            tracing::debug!("scheduling");
            let start = std::time::Instant::now();

            let result = self
                .execute(argument, inbound, output_rx, description_tx)
                .await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "completed"),
                Err(e) => {
                    tracing::error!(elapsed_ms, error = %e, "failed");
                    self.output.publish(Err(e.clone()));
                }
            }
            self.outbound.close();
            self.output.close();
            let _ = completion_tx.send(result);
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        argument: Value,
        inbound: mpsc::UnboundedReceiver<InboundMessage>,
        mut output_rx: OutboundReceiver,
        description_tx: oneshot::Sender<Result<JobDescription, ArchitectError>>,
    ) -> JobResult {
        let handler = match self.scheduler.inner.registry.get(&self.name).await {
            Ok(Some(handler)) => handler,
            Ok(None) => {
                let err = ArchitectError::NotFound(self.name.clone());
                let _ = description_tx.send(Err(err.clone()));
                return Err(err);
            }
            Err(e) => {
                let _ = description_tx.send(Err(e.clone()));
                return Err(e);
            }
        };
        let description = handler.description().clone();
        let _ = description_tx.send(Ok(description.clone()));

        let context = JobContext::new(
            self.id,
            description,
            inbound,
            self.outbound.clone(),
            self.scheduler.clone(),
        );

        let outbound = self.outbound.clone();
        let run = async move {
            let result = handler.run(argument, context).await;
            outbound.close();
            result
        };
        let forward = async {
            while let Some(message) = output_rx.recv().await {
                if let OutboundMessage::Output(value) = message {
                    self.output.publish(Ok(value));
                }
            }
        };

        let (result, ()) = tokio::join!(run, forward);
        result
    }
}

/// A live job.
///
/// Dropping the handle does not stop the job; it only closes its inbound
/// bus, so a handler still waiting for input completes without it.
pub struct Job {
    id: RunId,
    name: String,
    inbound: mpsc::UnboundedSender<InboundMessage>,
    outbound: OutboundBus,
    output: Replay<Result<Value, ArchitectError>>,
    description: SharedResult<JobDescription>,
    completion: SharedResult<()>,
    result: SharedResult<Value>,
}

impl Job {
    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description of the resolved handler; fails with `NotFound` if the
    /// name did not resolve
    pub async fn description(&self) -> Result<JobDescription, ArchitectError> {
        self.description.clone().await
    }

    /// Send an Input message; false if the job no longer listens
    pub fn input(&self, value: Value) -> bool {
        self.inbound.send(InboundMessage::Input(value)).is_ok()
    }

    /// Subscribe to part of the outbound stream from now on
    pub fn subscribe(&self, filter: ChannelFilter) -> OutboundReceiver {
        self.outbound.subscribe(filter)
    }

    /// Outputs, replaying the latest; a failed job ends with its error
    pub fn output(&self) -> ReplayReceiver<Result<Value, ArchitectError>> {
        self.output.subscribe()
    }

    /// The first output of the job
    pub async fn result(&self) -> Result<Value, ArchitectError> {
        self.result.clone().await
    }

    /// Resolves once the job completed, with its failure if it failed
    pub async fn completion(&self) -> Result<(), ArchitectError> {
        self.completion.clone().await
    }

    /// Completion that does not borrow the handle
    pub(crate) fn completed(
        &self,
    ) -> impl Future<Output = Result<(), ArchitectError>> + Send + 'static {
        self.completion.clone()
    }

    /// Send a Stop message without waiting; false if the job already ended
    pub fn request_stop(&self) -> bool {
        self.inbound.send(InboundMessage::Stop).is_ok()
    }

    /// Request a stop and wait for the job to complete.
    ///
    /// Only teardown failures are reported; other failures are observed
    /// through `result` and `output`.
    pub async fn stop(&self) -> Result<(), ArchitectError> {
        self.request_stop();
        match self.completion().await {
            Err(e @ ArchitectError::TeardownFailure(_)) => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
