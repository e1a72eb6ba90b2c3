// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory key-value store
//!
//! Mirrors browser local storage: a bounded byte budget shared by keys and
//! values. Can be told to fail, so callers' failure paths can be exercised.
//! With `test-support` it also records every successful write.

use crate::kv::{validate_key, KvError, KvStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    entries: HashMap<String, String>,
    #[cfg(any(test, feature = "test-support"))]
    writes: Vec<(String, String)>,
    fail_with: Option<String>,
}

#[derive(Clone, Default)]
pub struct MemoryKvStore {
    inner: Arc<Mutex<Inner>>,
    capacity: Option<usize>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the store to `bytes` of keys plus values
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            inner: Arc::default(),
            capacity: Some(bytes),
        }
    }

    /// Make every subsequent operation fail with `reason` (`None` to heal)
    pub fn set_failure(&self, reason: Option<&str>) {
        self.lock().fail_with = reason.map(str::to_string);
    }

    /// Successful writes, oldest first
    #[cfg(any(test, feature = "test-support"))]
    pub fn writes(&self) -> Vec<(String, String)> {
        self.lock().writes.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let inner = self.lock();
        if let Some(reason) = &inner.fail_with {
            return Err(KvError::Unavailable(reason.clone()));
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        validate_key(key)?;
        let mut inner = self.lock();
        if let Some(reason) = &inner.fail_with {
            return Err(KvError::Unavailable(reason.clone()));
        }

        if let Some(capacity) = self.capacity {
            let used: usize = inner
                .entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = key.len() + value.len();
            if used + needed > capacity {
                return Err(KvError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    capacity: capacity.saturating_sub(used),
                });
            }
        }

        inner.entries.insert(key.to_string(), value.to_string());
        #[cfg(any(test, feature = "test-support"))]
        inner.writes.push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        let mut inner = self.lock();
        if let Some(reason) = &inner.fail_with {
            return Err(KvError::Unavailable(reason.clone()));
        }
        inner.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
