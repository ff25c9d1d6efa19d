// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake schema registry for testing
//!
//! Understands a small subset of JSON schema: `required`, per-property
//! `type` and `default`, and `additionalProperties: false`.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SchemaError, SchemaRegistry, SchemaValidator, ValidationResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Fake schema registry for testing
#[derive(Clone, Default)]
pub struct FakeSchemaRegistry {
    compiled: Arc<Mutex<Vec<Value>>>,
    compile_error: Arc<Mutex<Option<String>>>,
}

impl FakeSchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schemas compiled so far
    pub fn compiled(&self) -> Vec<Value> {
        self.compiled
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Make every subsequent compile fail
    pub fn fail_compile(&self, reason: &str) {
        *self
            .compile_error
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(reason.to_string());
    }
}

#[async_trait]
impl SchemaRegistry for FakeSchemaRegistry {
    async fn compile(&self, schema: &Value) -> Result<Arc<dyn SchemaValidator>, SchemaError> {
        self.compiled
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(schema.clone());

        if let Some(reason) = self
            .compile_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(SchemaError::Compile(reason));
        }
        Ok(Arc::new(SubsetValidator {
            schema: schema.clone(),
        }))
    }
}

struct SubsetValidator {
    schema: Value,
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

#[async_trait]
impl SchemaValidator for SubsetValidator {
    async fn validate(&self, value: &Value) -> Result<ValidationResult, SchemaError> {
        match &self.schema {
            Value::Bool(true) => return Ok(ValidationResult::valid(value.clone())),
            Value::Bool(false) => {
                return Ok(ValidationResult::invalid(vec![
                    "schema rejects every value".to_string(),
                ]))
            }
            _ => {}
        }

        let Some(object) = value.as_object() else {
            return Ok(ValidationResult::invalid(vec!["must be object".to_string()]));
        };

        let mut data = object.clone();
        let mut errors = Vec::new();

        let properties = self.schema.get("properties").and_then(Value::as_object);
        if let Some(properties) = properties {
            for (key, property) in properties {
                match data.get(key) {
                    Some(present) => {
                        if let Some(expected) = property.get("type").and_then(Value::as_str) {
                            if !type_matches(expected, present) {
                                errors.push(format!("/{key} must be {expected}"));
                            }
                        }
                    }
                    None => {
                        if let Some(default) = property.get("default") {
                            data.insert(key.clone(), default.clone());
                        }
                    }
                }
            }
        }

        if let Some(required) = self.schema.get("required").and_then(Value::as_array) {
            for key in required.iter().filter_map(Value::as_str) {
                if !data.contains_key(key) {
                    errors.push(format!("must have required property '{key}'"));
                }
            }
        }

        if self.schema.get("additionalProperties") == Some(&Value::Bool(false)) {
            for key in object.keys() {
                if !properties.is_some_and(|p| p.contains_key(key)) {
                    errors.push(format!("must NOT have additional property '{key}'"));
                }
            }
        }

        if errors.is_empty() {
            Ok(ValidationResult::valid(Value::Object(data)))
        } else {
            Ok(ValidationResult::invalid(errors))
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
