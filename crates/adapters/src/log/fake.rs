// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collecting log sink for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::LogSink;
use arch_core::LogEntry;
use std::sync::{Arc, Mutex};

/// Log sink that keeps every entry
#[derive(Clone, Default)]
pub struct CollectingLogSink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CollectingLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Messages in arrival order
    pub fn messages(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|entry| entry.message)
            .collect()
    }
}

impl LogSink for CollectingLogSink {
    fn log(&self, entry: &LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry.clone());
    }
}
