// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builder option objects

use serde_json::{Map, Value};

/// A JSON object of builder options.
pub type JsonObject = Map<String, Value>;

/// Shallow merge: keys in `overrides` replace keys in `base`.
pub fn merge_options(base: &JsonObject, overrides: &JsonObject) -> JsonObject {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
