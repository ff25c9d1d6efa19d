// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job descriptions and the names of the host-facing internal jobs

use crate::builder::BuilderInfo;
use crate::target::Target;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Internal job: `Target` -> options declared for the target.
pub const GET_TARGET_OPTIONS: &str = "..getTargetOptions";
/// Internal job: `Target` -> builder name declared for the target.
pub const GET_BUILDER_NAME_FOR_TARGET: &str = "..getBuilderNameForTarget";
/// Internal job: `Target` or project name -> project metadata.
pub const GET_PROJECT_METADATA: &str = "..getProjectMetadata";
/// Internal job: `[builderName, options]` -> validated options.
pub const VALIDATE_OPTIONS: &str = "..validateOptions";

/// Describes a schedulable unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescription {
    pub name: String,
    pub argument_schema: Value,
    pub input_schema: Value,
    pub output_schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<BuilderInfo>,
}

impl JobDescription {
    /// Description of an opaque job accepting any argument.
    pub fn raw(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument_schema: Value::Bool(true),
            input_schema: Value::Bool(true),
            output_schema: Value::Bool(true),
            info: None,
        }
    }

    /// Description of a builder job, named after the target when bound to one.
    pub fn for_builder(info: &BuilderInfo, target: Option<&Target>) -> Self {
        let name = match target {
            Some(target) => target.job_name(),
            None => info.builder_name.clone(),
        };
        Self {
            name,
            argument_schema: json!({"type": "object"}),
            input_schema: json!({
                "type": "object",
                "required": ["id", "info", "options", "workspaceRoot", "currentDirectory"],
            }),
            output_schema: json!({
                "type": "object",
                "required": ["success"],
                "properties": {
                    "success": {"type": "boolean"},
                    "error": {"type": "string"},
                },
            }),
            info: Some(info.clone()),
        }
    }
}
