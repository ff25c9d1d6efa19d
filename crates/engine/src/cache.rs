// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only resolution caches

use crate::job::JobHandlerRef;
use arch_core::{ArchitectError, BuilderInfo};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

type Resolution<V> = Shared<BoxFuture<'static, Result<Option<V>, ArchitectError>>>;

/// Caches the resolution future per key.
///
/// The first caller's resolution is stored before it runs, so concurrent
/// callers for the same key await the same in-flight future. Entries are
/// never evicted, failures included.
pub struct ResolutionCache<V> {
    entries: Mutex<HashMap<String, Resolution<V>>>,
}

impl<V: Clone + Send + Sync + 'static> ResolutionCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Await the cached resolution for `key`, starting `resolve` if absent.
    pub async fn get_or_resolve<F, Fut>(
        &self,
        key: &str,
        resolve: F,
    ) -> Result<Option<V>, ArchitectError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<V>, ArchitectError>> + Send + 'static,
    {
        let resolution = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            match entries.get(key) {
                Some(resolution) => {
                    tracing::trace!(key, "resolution cache hit");
                    resolution.clone()
                }
                None => {
                    let resolution = resolve().boxed().shared();
                    entries.insert(key.to_string(), resolution.clone());
                    resolution
                }
            }
        };
        resolution.await
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone + Send + Sync + 'static> Default for ResolutionCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// The two caches owned by one architect: builder name to builder info,
/// and target job name or builder name to job handler.
#[derive(Clone, Default)]
pub struct ResolutionCaches {
    pub builder_info: Arc<ResolutionCache<BuilderInfo>>,
    pub job_handlers: Arc<ResolutionCache<JobHandlerRef>>,
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
