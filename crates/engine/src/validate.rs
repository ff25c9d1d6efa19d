// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use arch_adapters::SchemaRegistry;
use arch_core::{ArchitectError, JsonObject};
use serde_json::Value;

/// Validate `options` against `schema`.
///
/// Returns the validator's data when it produced an object (schema
/// defaults applied), the options unchanged otherwise.
pub async fn validate_options(
    schemas: &dyn SchemaRegistry,
    schema: &Value,
    options: JsonObject,
) -> Result<JsonObject, ArchitectError> {
    let validator = schemas.compile(schema).await?;
    let result = validator.validate(&Value::Object(options.clone())).await?;

    if !result.success {
        tracing::debug!(errors = result.errors.len(), "options rejected by schema");
        return Err(ArchitectError::schema_validation(result.errors));
    }
    match result.data {
        Some(Value::Object(data)) => Ok(data),
        _ => Ok(options),
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
