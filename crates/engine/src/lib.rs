// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Architect execution engine: registries, scheduler and the builder adapter

mod architect;
mod builder;
mod cache;
mod context;
mod host_registry;
mod internal;
mod job;
mod logger;
mod registry;
mod run;
mod scheduler;
mod validate;

#[cfg(test)]
mod test_helpers;

pub use architect::Architect;
pub use builder::{create_builder, Builder, BuilderFn, BuilderOutputLike, OutputStream};
pub use cache::{ResolutionCache, ResolutionCaches};
pub use context::BuilderContext;
pub use job::{create_job_handler, JobContext, JobHandler, JobHandlerRef, JobResult};
pub use logger::BuilderLogger;
pub use registry::{FallbackRegistry, JobRegistry, SimpleRegistry};
pub use run::{Run, ScheduleOptions};
pub use scheduler::{Job, Scheduler};
pub use validate::validate_options;
