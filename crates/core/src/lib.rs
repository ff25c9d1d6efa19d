// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! arch-core: value types shared by the architect crates
//!
//! This crate provides:
//! - Targets, builder metadata and builder outputs
//! - The pure progress state machine
//! - Inbound/outbound job message envelopes
//! - The per-job channel bus and replayed streams
//! - Configuration and the error taxonomy

pub mod builder;
pub mod channel;
pub mod config;
pub mod error;
pub mod id;
pub mod job;
pub mod message;
pub mod options;
pub mod progress;
pub mod target;

pub use builder::{is_builder_name, validate_builder_name, BuilderInfo, BuilderOutput};
pub use channel::{ChannelFilter, OutboundBus, OutboundReceiver, Replay, ReplayReceiver};
pub use config::{ArchitectConfig, ConfigError};
pub use error::ArchitectError;
pub use id::{RunId, SequentialIdGen};
pub use job::JobDescription;
pub use message::{
    AnalyticsReport, BuilderInput, ChannelKind, InboundMessage, LogEntry, LogLevel,
    OutboundMessage,
};
pub use options::{merge_options, JsonObject};
pub use progress::{Phase, ProgressReport, ProgressState, ProgressTracker};
pub use target::Target;
