// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress states and the per-run progress state machine
//!
//! The tracker is pure: every operation returns the state to emit (if any)
//! and the caller is responsible for publishing it on the progress channel.

use crate::builder::BuilderInfo;
use crate::id::RunId;
use crate::target::Target;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A progress state as reported on the progress channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ProgressState {
    Stopped,
    Error {
        error: Value,
    },
    Waiting {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<String>,
    },
    Running {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<String>,
        current: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total: Option<u64>,
    },
}

impl ProgressState {
    pub fn running(current: u64, total: u64) -> Self {
        Self::Running {
            status: None,
            current,
            total: Some(total),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Self::Stopped => Phase::Stopped,
            Self::Error { .. } => Phase::Error,
            Self::Waiting { .. } => Phase::Waiting,
            Self::Running { .. } => Phase::Running,
        }
    }
}

/// A progress state annotated with the run it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    #[serde(flatten)]
    pub state: ProgressState,
    pub id: RunId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder: Option<BuilderInfo>,
}

/// Discriminant of [`ProgressState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stopped,
    Error,
    Waiting,
    Running,
}

/// Progress bookkeeping for one builder invocation.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    phase: Phase,
    current: u64,
    total: u64,
    status: String,
    // Set by `begin` until the builder reports anything
    forced: bool,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            phase: Phase::Stopped,
            current: 0,
            total: 1,
            status: String::new(),
            forced: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn status(&self) -> Option<&str> {
        (!self.status.is_empty()).then_some(self.status.as_str())
    }

    /// Record `state` as current, filling tracked fields it leaves out.
    ///
    /// Running states update `current`, update `total` when given, and either
    /// store the given status or inherit the stored one.
    pub fn apply(&mut self, state: ProgressState) -> ProgressState {
        self.phase = state.phase();
        self.forced = false;
        match state {
            ProgressState::Running {
                status,
                current,
                total,
            } => {
                self.current = current;
                if let Some(total) = total {
                    self.total = total;
                }
                let status = match status {
                    Some(status) => {
                        self.status = status.clone();
                        Some(status)
                    }
                    None => self.status().map(str::to_string),
                };
                ProgressState::Running {
                    status,
                    current,
                    total: Some(self.total),
                }
            }
            ProgressState::Waiting { status } => {
                if let Some(status) = &status {
                    self.status = status.clone();
                }
                ProgressState::Waiting { status }
            }
            other => other,
        }
    }

    /// Force `Running{current: 0, total: 1}` ahead of a builder invocation.
    ///
    /// Status and progress reports take effect immediately afterwards. The
    /// builder's first `report_running` is still emitted once, unless it
    /// reported something else before.
    pub fn begin(&mut self) -> ProgressState {
        self.phase = Phase::Running;
        self.current = 0;
        self.total = 1;
        self.forced = true;
        ProgressState::running(0, 1)
    }

    pub fn report_running(&mut self) -> Option<ProgressState> {
        let idle = matches!(self.phase, Phase::Waiting | Phase::Stopped);
        (self.forced || idle).then(|| {
            self.apply(ProgressState::Running {
                status: None,
                current: 0,
                total: Some(self.total),
            })
        })
    }

    pub fn report_status(&mut self, status: impl Into<String>) -> Option<ProgressState> {
        let status = Some(status.into());
        match self.phase {
            Phase::Running => Some(self.apply(ProgressState::Running {
                status,
                current: self.current,
                total: Some(self.total),
            })),
            Phase::Waiting => Some(self.apply(ProgressState::Waiting { status })),
            Phase::Stopped | Phase::Error => None,
        }
    }

    pub fn report_progress(
        &mut self,
        current: u64,
        total: Option<u64>,
        status: Option<String>,
    ) -> Option<ProgressState> {
        if self.phase != Phase::Running {
            return None;
        }
        Some(self.apply(ProgressState::Running {
            status,
            current,
            total,
        }))
    }

    /// States emitted when a builder's output completes successfully.
    pub fn finish(&mut self) -> [ProgressState; 2] {
        let running = self.apply(ProgressState::Running {
            status: None,
            current: self.total,
            total: None,
        });
        [running, self.apply(ProgressState::Stopped)]
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
