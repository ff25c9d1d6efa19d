// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named loggers publishing onto a job's log channel

use arch_adapters::LogSink;
use arch_core::{LogEntry, LogLevel, OutboundBus, OutboundMessage};

/// Logger handed to builders.
///
/// Entries at or above the configured level are published on the job's
/// log channel and mirrored to `tracing`.
#[derive(Clone)]
pub struct BuilderLogger {
    name: String,
    outbound: OutboundBus,
    min_level: LogLevel,
}

impl BuilderLogger {
    pub(crate) fn new(name: impl Into<String>, outbound: OutboundBus, min_level: LogLevel) -> Self {
        Self {
            name: name.into(),
            outbound,
            min_level,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logger named `parent.name`; an empty name keeps the parent's name.
    pub fn child(&self, name: &str) -> Self {
        let name = if name.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, name)
        };
        Self {
            name,
            outbound: self.outbound.clone(),
            min_level: self.min_level,
        }
    }

    pub fn log_at(&self, level: LogLevel, message: impl Into<String>) {
        if level < self.min_level {
            return;
        }
        let entry = LogEntry::new(level, self.name.clone(), message);
        tracing::debug!(logger = %entry.logger, %level, text = %entry.message, "builder log");
        self.outbound.publish(OutboundMessage::Log(entry));
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log_at(LogLevel::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log_at(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log_at(LogLevel::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log_at(LogLevel::Error, message);
    }

    pub fn fatal(&self, message: impl Into<String>) {
        self.log_at(LogLevel::Fatal, message);
    }
}

// Lets a parent logger receive the entries of nested runs
impl LogSink for BuilderLogger {
    fn log(&self, entry: &LogEntry) {
        self.outbound.publish(OutboundMessage::Log(entry.clone()));
    }
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
