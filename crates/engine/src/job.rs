// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job handlers and the context a running job sees

use crate::scheduler::Scheduler;
use arch_core::{
    ArchitectError, InboundMessage, JobDescription, OutboundBus, OutboundMessage, RunId,
};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outcome of a job: `Ok` once its outbound stream completes normally
pub type JobResult = Result<(), ArchitectError>;

/// Shared handle to a resolved job handler
pub type JobHandlerRef = Arc<dyn JobHandler>;

/// A schedulable unit of work.
///
/// `run` is invoked once per scheduled job. It consumes inbound messages
/// from the context, publishes outputs and channel messages on the
/// context's outbound bus, and returns when the job is complete.
#[async_trait]
pub trait JobHandler: Send + Sync + 'static {
    fn description(&self) -> &JobDescription;

    async fn run(&self, argument: Value, context: JobContext) -> JobResult;
}

/// Per-invocation context handed to [`JobHandler::run`].
pub struct JobContext {
    id: RunId,
    description: JobDescription,
    inbound: mpsc::UnboundedReceiver<InboundMessage>,
    outbound: OutboundBus,
    scheduler: Scheduler,
}

impl JobContext {
    pub(crate) fn new(
        id: RunId,
        description: JobDescription,
        inbound: mpsc::UnboundedReceiver<InboundMessage>,
        outbound: OutboundBus,
        scheduler: Scheduler,
    ) -> Self {
        Self {
            id,
            description,
            inbound,
            outbound,
            scheduler,
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn description(&self) -> &JobDescription {
        &self.description
    }

    pub fn outbound(&self) -> &OutboundBus {
        &self.outbound
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Next inbound message; `None` once every sender is gone.
    pub async fn next_message(&mut self) -> Option<InboundMessage> {
        self.inbound.recv().await
    }

    /// Publish a primary output value.
    pub fn output(&self, value: Value) -> bool {
        self.outbound.publish(OutboundMessage::Output(value))
    }
}

/// Job handler backed by an async function of the argument.
///
/// The function's value becomes the job's single output. A Stop message
/// abandons the computation.
pub struct FnJobHandler<F> {
    description: JobDescription,
    f: F,
}

/// Wrap `f` as an opaque job registered under `name`.
pub fn create_job_handler<F, Fut>(name: &str, f: F) -> JobHandlerRef
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ArchitectError>> + Send + 'static,
{
    Arc::new(FnJobHandler {
        description: JobDescription::raw(name),
        f,
    })
}

#[async_trait]
impl<F, Fut> JobHandler for FnJobHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ArchitectError>> + Send + 'static,
{
    fn description(&self) -> &JobDescription {
        &self.description
    }

    async fn run(&self, argument: Value, mut context: JobContext) -> JobResult {
        let work = (self.f)(argument);
        tokio::pin!(work);
        loop {
            tokio::select! {
                result = &mut work => {
                    context.output(result?);
                    return Ok(());
                }
                message = context.next_message() => match message {
                    Some(InboundMessage::Stop) => return Ok(()),
                    // Raw jobs take no input; a closed inbound just means nobody can stop us
                    Some(InboundMessage::Input(_)) => {}
                    None => {
                        context.output((&mut work).await?);
                        return Ok(());
                    }
                },
            }
        }
    }
}
