// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job registries and fallback composition

use crate::job::JobHandlerRef;
use arch_core::ArchitectError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves a job name to a handler.
///
/// Names a registry does not understand resolve to `Ok(None)`; `Err` is
/// reserved for failures while resolving a name it does understand.
#[async_trait]
pub trait JobRegistry: Send + Sync + 'static {
    async fn get(&self, name: &str) -> Result<Option<JobHandlerRef>, ArchitectError>;
}

/// Registry of handlers known up front, keyed by description name
#[derive(Default)]
pub struct SimpleRegistry {
    handlers: HashMap<String, JobHandlerRef>,
}

impl SimpleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its description name, replacing any previous one
    pub fn register(&mut self, handler: JobHandlerRef) {
        let name = handler.description().name.clone();
        self.handlers.insert(name, handler);
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[async_trait]
impl JobRegistry for SimpleRegistry {
    async fn get(&self, name: &str) -> Result<Option<JobHandlerRef>, ArchitectError> {
        Ok(self.handlers.get(name).cloned())
    }
}

/// Tries member registries in order; the first non-empty resolution wins
#[derive(Default)]
pub struct FallbackRegistry {
    registries: Vec<Arc<dyn JobRegistry>>,
}

impl FallbackRegistry {
    pub fn new(registries: Vec<Arc<dyn JobRegistry>>) -> Self {
        Self { registries }
    }

    pub fn push(&mut self, registry: Arc<dyn JobRegistry>) {
        self.registries.push(registry);
    }

    pub fn len(&self) -> usize {
        self.registries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }
}

#[async_trait]
impl JobRegistry for FallbackRegistry {
    async fn get(&self, name: &str) -> Result<Option<JobHandlerRef>, ArchitectError> {
        for registry in &self.registries {
            if let Some(handler) = registry.get(name).await? {
                return Ok(Some(handler));
            }
        }
        tracing::debug!(name, "no registry resolved job");
        Ok(None)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
