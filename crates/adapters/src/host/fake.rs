// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory workspace host for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ArchitectHost, HostError};
use arch_core::{merge_options, BuilderInfo, JsonObject, Target};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded host call
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    ResolveBuilder { name: String },
    LoadBuilder { name: String },
    GetBuilderNameForTarget { target: Target },
    GetOptionsForTarget { target: Target },
    GetProjectMetadata { project: String },
}

/// A target declared in the fake workspace
#[derive(Debug, Clone)]
pub struct FakeTarget {
    pub builder: String,
    pub options: JsonObject,
    pub configurations: HashMap<String, JsonObject>,
}

struct FakeHostState<B> {
    builders: HashMap<String, (BuilderInfo, Option<B>)>,
    targets: HashMap<(String, String), FakeTarget>,
    projects: HashMap<String, JsonObject>,
    failures: HashMap<String, String>,
    resolve_delay: Option<Duration>,
}

/// Fake host for testing
#[derive(Clone)]
pub struct FakeHost<B> {
    state: Arc<Mutex<FakeHostState<B>>>,
    calls: Arc<Mutex<Vec<HostCall>>>,
    workspace_root: PathBuf,
    current_directory: PathBuf,
}

impl<B: Clone + Send + Sync + 'static> FakeHost<B> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeHostState {
                builders: HashMap::new(),
                targets: HashMap::new(),
                projects: HashMap::new(),
                failures: HashMap::new(),
                resolve_delay: None,
            })),
            calls: Arc::new(Mutex::new(Vec::new())),
            workspace_root: PathBuf::from("/workspace"),
            current_directory: PathBuf::from("/workspace"),
        }
    }

    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = root.into();
        self
    }

    pub fn with_current_directory(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.current_directory = cwd.into();
        self
    }

    /// Register a resolvable, loadable builder
    pub fn add_builder(&self, info: BuilderInfo, builder: B) {
        self.lock_state()
            .builders
            .insert(info.builder_name.clone(), (info, Some(builder)));
    }

    /// Register a builder that resolves but cannot be loaded
    pub fn add_unloadable_builder(&self, info: BuilderInfo) {
        self.lock_state()
            .builders
            .insert(info.builder_name.clone(), (info, None));
    }

    pub fn add_target(&self, project: &str, target: &str, builder: &str, options: JsonObject) {
        self.lock_state().targets.insert(
            (project.to_string(), target.to_string()),
            FakeTarget {
                builder: builder.to_string(),
                options,
                configurations: HashMap::new(),
            },
        );
    }

    /// Add a named configuration to an existing target
    pub fn add_configuration(
        &self,
        project: &str,
        target: &str,
        configuration: &str,
        options: JsonObject,
    ) {
        let mut state = self.lock_state();
        if let Some(entry) = state
            .targets
            .get_mut(&(project.to_string(), target.to_string()))
        {
            entry
                .configurations
                .insert(configuration.to_string(), options);
        }
    }

    pub fn add_project(&self, project: &str, metadata: JsonObject) {
        self.lock_state()
            .projects
            .insert(project.to_string(), metadata);
    }

    /// Make resolving `name` fail with a workspace error
    pub fn fail_resolution(&self, name: &str, reason: &str) {
        self.lock_state()
            .failures
            .insert(name.to_string(), reason.to_string());
    }

    /// Delay every builder resolution (to exercise concurrent lookups)
    pub fn set_resolve_delay(&self, delay: Duration) {
        self.lock_state().resolve_delay = Some(delay);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of recorded calls matching `predicate`
    pub fn count_calls(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|call| predicate(call))
            .count()
    }

    pub fn resolve_count(&self, name: &str) -> usize {
        self.count_calls(|call| matches!(call, HostCall::ResolveBuilder { name: n } if n == name))
    }

    pub fn load_count(&self, name: &str) -> usize {
        self.count_calls(|call| matches!(call, HostCall::LoadBuilder { name: n } if n == name))
    }

    fn record(&self, call: HostCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FakeHostState<B>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn find_target(&self, target: &Target) -> Option<FakeTarget> {
        self.lock_state()
            .targets
            .get(&(target.project.clone(), target.target.clone()))
            .cloned()
    }
}

impl<B: Clone + Send + Sync + 'static> Default for FakeHost<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<B: Clone + Send + Sync + 'static> ArchitectHost for FakeHost<B> {
    type Builder = B;

    async fn resolve_builder(&self, name: &str) -> Result<Option<BuilderInfo>, HostError> {
        self.record(HostCall::ResolveBuilder {
            name: name.to_string(),
        });

        let delay = self.lock_state().resolve_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.lock_state();
        if let Some(reason) = state.failures.get(name) {
            return Err(HostError::Workspace(reason.clone()));
        }
        Ok(state.builders.get(name).map(|(info, _)| info.clone()))
    }

    async fn load_builder(&self, info: &BuilderInfo) -> Result<Option<B>, HostError> {
        self.record(HostCall::LoadBuilder {
            name: info.builder_name.clone(),
        });
        Ok(self
            .lock_state()
            .builders
            .get(&info.builder_name)
            .and_then(|(_, builder)| builder.clone()))
    }

    async fn get_builder_name_for_target(
        &self,
        target: &Target,
    ) -> Result<Option<String>, HostError> {
        self.record(HostCall::GetBuilderNameForTarget {
            target: target.clone(),
        });
        Ok(self.find_target(target).map(|t| t.builder))
    }

    async fn get_options_for_target(
        &self,
        target: &Target,
    ) -> Result<Option<JsonObject>, HostError> {
        self.record(HostCall::GetOptionsForTarget {
            target: target.clone(),
        });
        let Some(declared) = self.find_target(target) else {
            return Ok(None);
        };

        let mut options = declared.options;
        // Comma-separated configurations apply left to right
        let configurations = target.configuration.as_deref().unwrap_or_default();
        for name in configurations.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let overrides = declared.configurations.get(name).ok_or_else(|| {
                HostError::ConfigurationNotFound {
                    target: target.to_string(),
                    configuration: name.to_string(),
                }
            })?;
            options = merge_options(&options, overrides);
        }
        Ok(Some(options))
    }

    async fn get_project_metadata(&self, project: &str) -> Result<Option<JsonObject>, HostError> {
        self.record(HostCall::GetProjectMetadata {
            project: project.to_string(),
        });
        Ok(self.lock_state().projects.get(project).cloned())
    }

    fn current_directory(&self) -> PathBuf {
        self.current_directory.clone()
    }

    fn workspace_root(&self) -> PathBuf {
        self.workspace_root.clone()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
