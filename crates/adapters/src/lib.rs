// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the architect's external collaborators

pub mod host;
pub mod log;
pub mod schema;
pub mod traced;

pub use host::{ArchitectHost, HostError};
pub use log::{LogSink, NullLogSink, TracingLogSink};
pub use schema::{
    NoOpSchemaRegistry, SchemaError, SchemaRegistry, SchemaValidator, ValidationResult,
};
pub use traced::TracedHost;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use host::{FakeHost, FakeTarget, HostCall};
#[cfg(any(test, feature = "test-support"))]
pub use log::CollectingLogSink;
#[cfg(any(test, feature = "test-support"))]
pub use schema::FakeSchemaRegistry;
