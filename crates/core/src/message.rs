// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Messages flowing into and out of a running job

use crate::builder::BuilderInfo;
use crate::id::RunId;
use crate::options::JsonObject;
use crate::progress::ProgressReport;
use crate::target::Target;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Input sent to a builder job once it is scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderInput {
    pub id: RunId,
    pub info: BuilderInfo,
    pub options: JsonObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    pub workspace_root: PathBuf,
    pub current_directory: PathBuf,
}

/// Messages on a job's inbound bus.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Input(Value),
    Stop,
}

/// Named sub-streams multiplexed onto a job's outbound stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Progress,
    Log,
    Analytics,
}

impl ChannelKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Progress => "progress",
            Self::Log => "log",
            Self::Analytics => "analytics",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Envelope for everything a job emits: primary outputs and tagged channel
/// messages share one ordered stream.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    Output(Value),
    Progress(ProgressReport),
    Log(LogEntry),
    Analytics(AnalyticsReport),
}

impl OutboundMessage {
    /// Channel tag, or `None` for primary output.
    pub fn channel(&self) -> Option<ChannelKind> {
        match self {
            Self::Output(_) => None,
            Self::Progress(_) => Some(ChannelKind::Progress),
            Self::Log(_) => Some(ChannelKind::Log),
            Self::Analytics(_) => Some(ChannelKind::Analytics),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// A structured log entry produced by a builder logger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Dotted name of the logger that produced the entry.
    pub logger: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(level: LogLevel, logger: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            logger: logger.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Usage telemetry reported by a builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AnalyticsReport {
    Event {
        category: String,
        action: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
    Timing {
        category: String,
        variable: String,
        time_ms: u64,
    },
}

impl AnalyticsReport {
    pub fn event(category: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Event {
            category: category.into(),
            action: action.into(),
            label: None,
            value: None,
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
