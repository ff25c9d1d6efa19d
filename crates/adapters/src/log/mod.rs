// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log sinks receiving builder log entries

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::CollectingLogSink;

use arch_core::{LogEntry, LogLevel};

/// Destination for the log entries of a run
pub trait LogSink: Send + Sync + 'static {
    fn log(&self, entry: &LogEntry);
}

/// Sink that discards everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLogSink;

impl LogSink for NullLogSink {
    fn log(&self, _entry: &LogEntry) {}
}

/// Sink that forwards entries to `tracing`
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, entry: &LogEntry) {
        let logger = entry.logger.as_str();
        let message = entry.message.as_str();
        match entry.level {
            LogLevel::Debug => tracing::debug!(logger, "{message}"),
            LogLevel::Info => tracing::info!(logger, "{message}"),
            LogLevel::Warn => tracing::warn!(logger, "{message}"),
            LogLevel::Error => tracing::error!(logger, "{message}"),
            LogLevel::Fatal => tracing::error!(logger, fatal = true, "{message}"),
        }
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
