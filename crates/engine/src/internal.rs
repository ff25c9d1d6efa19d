// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host-facing internal jobs (`..`-prefixed names)

use crate::builder::Builder;
use crate::host_registry::Resolver;
use crate::job::create_job_handler;
use crate::registry::SimpleRegistry;
use crate::scheduler::Scheduler;
use crate::validate::validate_options;
use arch_adapters::ArchitectHost;
use arch_core::job::{
    GET_BUILDER_NAME_FOR_TARGET, GET_PROJECT_METADATA, GET_TARGET_OPTIONS, VALIDATE_OPTIONS,
};
use arch_core::{ArchitectError, JsonObject, Target};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schedule an internal job and decode its single output
pub(crate) async fn request<T: DeserializeOwned>(
    scheduler: &Scheduler,
    name: &str,
    argument: impl Serialize,
) -> Result<T, ArchitectError> {
    let argument = serde_json::to_value(argument)
        .map_err(|e| ArchitectError::InvalidMessage(e.to_string()))?;
    let value = scheduler.schedule(name, argument).result().await?;
    serde_json::from_value(value)
        .map_err(|e| ArchitectError::InvalidMessage(format!("{name} returned {e}")))
}

fn decode<T: DeserializeOwned>(job: &str, argument: Value) -> Result<T, ArchitectError> {
    serde_json::from_value(argument)
        .map_err(|e| ArchitectError::InvalidMessage(format!("{job}: {e}")))
}

/// Project metadata may be requested by target or by project name
#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectRef {
    Target(Target),
    Name(String),
}

impl ProjectRef {
    fn project(&self) -> &str {
        match self {
            Self::Target(target) => &target.project,
            Self::Name(name) => name,
        }
    }
}

/// Registry answering the internal jobs from the host
pub(crate) fn internal_registry<H>(resolver: Resolver<H>) -> SimpleRegistry
where
    H: ArchitectHost<Builder = Builder>,
{
    let mut registry = SimpleRegistry::new();

    let host = resolver.host().clone();
    registry.register(create_job_handler(GET_TARGET_OPTIONS, move |argument| {
        let host = host.clone();
        async move {
            let target: Target = decode(GET_TARGET_OPTIONS, argument)?;
            let options = host
                .get_options_for_target(&target)
                .await?
                .ok_or_else(|| ArchitectError::NotFound(target.job_name()))?;
            Ok(Value::Object(options))
        }
    }));

    let host = resolver.host().clone();
    registry.register(create_job_handler(
        GET_BUILDER_NAME_FOR_TARGET,
        move |argument| {
            let host = host.clone();
            async move {
                let target: Target = decode(GET_BUILDER_NAME_FOR_TARGET, argument)?;
                let name = host
                    .get_builder_name_for_target(&target)
                    .await?
                    .ok_or_else(|| ArchitectError::NotFound(target.job_name()))?;
                Ok(Value::String(name))
            }
        },
    ));

    let host = resolver.host().clone();
    registry.register(create_job_handler(GET_PROJECT_METADATA, move |argument| {
        let host = host.clone();
        async move {
            let project: ProjectRef = decode(GET_PROJECT_METADATA, argument)?;
            let metadata = host
                .get_project_metadata(project.project())
                .await?
                .ok_or_else(|| ArchitectError::NotFound(project.project().to_string()))?;
            Ok(Value::Object(metadata))
        }
    }));

    registry.register(create_job_handler(VALIDATE_OPTIONS, move |argument| {
        let resolver = resolver.clone();
        async move {
            let (builder_name, options): (String, JsonObject) =
                decode(VALIDATE_OPTIONS, argument)?;
            let info = resolver
                .builder_info(&builder_name)
                .await?
                .ok_or(ArchitectError::NotFound(builder_name))?;
            let validated =
                validate_options(resolver.schemas(), &info.option_schema, options).await?;
            Ok(Value::Object(validated))
        }
    }));

    registry
}

#[cfg(test)]
#[path = "internal_tests.rs"]
mod tests;
