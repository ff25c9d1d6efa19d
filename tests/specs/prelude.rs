//! Shared fixtures for the architect specs

#![allow(dead_code, unused_imports)]

pub use arch_adapters::{CollectingLogSink, FakeHost, FakeSchemaRegistry, HostCall};
pub use arch_core::{
    ArchitectConfig, ArchitectError, BuilderInfo, BuilderOutput, JsonObject, ProgressReport,
    ProgressState, ReplayReceiver, Target,
};
pub use arch_engine::{
    create_builder, Architect, Builder, BuilderContext, BuilderOutputLike, Run, ScheduleOptions,
};
pub use serde_json::{json, Value};
pub use std::sync::atomic::{AtomicUsize, Ordering};
pub use std::sync::Arc;

pub type Workspace = FakeHost<Builder>;

pub fn object(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

pub fn running(current: u64, total: u64, status: Option<&str>) -> ProgressState {
    ProgressState::Running {
        status: status.map(str::to_string),
        current,
        total: Some(total),
    }
}

/// Builder that succeeds with the options it received under `options`
pub fn echo() -> Builder {
    create_builder(|options, context| {
        context.logger().info(format!("echo {}", options.len()));
        Ok(BuilderOutput::success()
            .with_info("options", Value::Object(options))
            .into())
    })
}

/// Workspace declaring builder `pkg:echo` and target `app:build` using it
/// with options `{a: 1, b: 2}` (configuration `prod` sets `b: 5`).
pub fn workspace() -> Workspace {
    let host = FakeHost::new()
        .with_workspace_root("/workspace")
        .with_current_directory("/workspace/apps/app");
    host.add_builder(echo_info(), echo());
    host.add_target("app", "build", "pkg:echo", object(json!({"a": 1, "b": 2})));
    host.add_configuration("app", "build", "prod", object(json!({"b": 5})));
    host
}

pub fn echo_info() -> BuilderInfo {
    BuilderInfo::new("pkg:echo", "Echo options back", json!({"type": "object"}))
}

/// Register `builder` as `name` with a permissive option schema
pub fn add_builder(host: &Workspace, name: &str, builder: Builder) {
    host.add_builder(BuilderInfo::new(name, "", json!(true)), builder);
}

pub fn architect(host: &Workspace) -> Architect<Workspace> {
    Architect::new(host.clone(), Arc::new(FakeSchemaRegistry::new()))
}

/// Drain a progress subscription taken before the run made progress
pub async fn states(mut progress: ReplayReceiver<ProgressReport>) -> Vec<ProgressState> {
    let mut states = Vec::new();
    while let Some(report) = progress.recv().await {
        states.push(report.state);
    }
    states
}
