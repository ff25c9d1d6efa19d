// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests

use crate::architect::Architect;
use crate::builder::{create_builder, Builder};
use arch_adapters::{FakeHost, FakeSchemaRegistry};
use arch_core::{BuilderInfo, BuilderOutput, JsonObject};
use serde_json::{json, Value};
use std::sync::Arc;

pub(crate) type TestArchitect = Architect<FakeHost<Builder>>;

pub(crate) fn object(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// Succeeds with the options it received under `options`
pub(crate) fn echo_builder() -> Builder {
    create_builder(|options, context| {
        context.logger().info("building");
        Ok(BuilderOutput::success()
            .with_info("options", Value::Object(options))
            .into())
    })
}

pub(crate) fn build_info() -> BuilderInfo {
    BuilderInfo::new(
        "pkg:build",
        "Echoes its options",
        json!({"type": "object", "properties": {"name": {"type": "string"}}}),
    )
}

/// Workspace with `pkg:build`, an unloadable `pkg:broken`, target
/// `app:build` (configurations `prod` and `eu`) and target `app:lint`
/// pointing at a builder the host does not know.
pub(crate) fn fixture_host() -> FakeHost<Builder> {
    let host = FakeHost::new();
    host.add_builder(build_info(), echo_builder());
    host.add_unloadable_builder(BuilderInfo::new("pkg:broken", "", json!(true)));
    host.add_target("app", "build", "pkg:build", object(json!({"a": 1, "b": 2})));
    host.add_configuration("app", "build", "prod", object(json!({"b": 3})));
    host.add_configuration("app", "build", "eu", object(json!({"locale": "eu"})));
    host.add_target("app", "lint", "pkg:missing", JsonObject::new());
    host.add_project("app", object(json!({"root": "apps/app"})));
    host
}

pub(crate) fn architect(host: FakeHost<Builder>) -> TestArchitect {
    Architect::new(host, Arc::new(FakeSchemaRegistry::new()))
}
