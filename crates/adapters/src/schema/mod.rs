// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Option schema compilation and validation adapters

mod noop;

pub use noop::NoOpSchemaRegistry;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSchemaRegistry;

use arch_core::ArchitectError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Errors from schema operations
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema could not be compiled: {0}")]
    Compile(String),
    #[error("validator failed: {0}")]
    Validate(String),
}

impl From<SchemaError> for ArchitectError {
    fn from(err: SchemaError) -> Self {
        ArchitectError::schema_validation([err.to_string()])
    }
}

/// Outcome of validating one value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationResult {
    pub success: bool,
    /// The value after validation (e.g. with schema defaults applied)
    pub data: Option<Value>,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn valid(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            errors,
        }
    }
}

/// A compiled schema
#[async_trait]
pub trait SchemaValidator: Send + Sync {
    async fn validate(&self, value: &Value) -> Result<ValidationResult, SchemaError>;
}

/// Compiles JSON schemas into validators
#[async_trait]
pub trait SchemaRegistry: Send + Sync + 'static {
    async fn compile(&self, schema: &Value) -> Result<Arc<dyn SchemaValidator>, SchemaError>;
}
