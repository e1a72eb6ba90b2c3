// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Debounced durable auto-save and the unsaved-changes exit guard
//!
//! Auto-save is best effort. Write and read failures are logged and
//! published on the event bus, never returned to the editing flow; the
//! in-memory value stays authoritative.

use crate::debounce::Debouncer;
use af_core::config::AutosaveSection;
use af_core::{Event, EventBus};
use af_storage::{load_json, save_json, KvStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Key under `prefix`, as `prefix:key`
pub fn namespaced_key(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{key}"),
        _ => key.to_string(),
    }
}

/// Last persisted value under `key`. Absent, unreadable and unparsable
/// values all read as `None`.
pub fn load<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
{
    match load_json(store, key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unreadable autosave");
            None
        }
    }
}

/// Remove the value under `key`; idempotent
pub fn clear<S: KvStore + ?Sized>(store: &S, key: &str) {
    if let Err(e) = store.remove(key) {
        tracing::warn!(key, error = %e, "failed to clear autosave");
    }
}

/// Persists the latest pushed value once edits pause
pub struct AutoSave<T, S> {
    key: String,
    store: S,
    debouncer: Debouncer<T>,
}

impl<T, S> AutoSave<T, S>
where
    T: Serialize + Send + 'static,
    S: KvStore + Clone,
{
    /// Must be called from within a tokio runtime
    pub fn spawn(key: impl Into<String>, store: S, interval: Duration, bus: EventBus) -> Self {
        let key = key.into();
        let sink = {
            let key = key.clone();
            let store = store.clone();
            move |value: T| match save_json(&store, &key, &value) {
                Ok(()) => {
                    tracing::debug!(key = %key, "autosaved");
                    bus.publish(Event::AutosavePersisted { key: key.clone() });
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "autosave failed");
                    bus.publish(Event::AutosaveFailed {
                        key: key.clone(),
                        error: e.to_string(),
                    });
                }
            }
        };

        Self {
            debouncer: Debouncer::spawn(interval, sink),
            key,
            store,
        }
    }

    /// Spawn with the interval and key namespace from configuration
    pub fn from_config(
        key: &str,
        store: S,
        section: &AutosaveSection,
        bus: EventBus,
    ) -> Self {
        let key = namespaced_key(section.key_prefix.as_deref(), key);
        Self::spawn(key, store, section.debounce, bus)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn interval(&self) -> Duration {
        self.debouncer.interval()
    }

    /// Record a change; restarts the quiet window
    pub fn push(&self, value: T) {
        self.debouncer.push(value);
    }

    /// Persist the pending value now
    pub async fn flush(&self) {
        self.debouncer.flush().await;
    }

    /// Stop saving. A pending value is dropped.
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }

    /// Drop any pending value and remove the persisted one. A save already
    /// under way finishes first and is removed too.
    pub async fn clear(&self) {
        let store = self.store.clone();
        let key = self.key.clone();
        self.debouncer.clear_with(move || clear(&store, &key)).await;
    }
}

impl<T, S> AutoSave<T, S>
where
    T: DeserializeOwned,
    S: KvStore,
{
    pub fn load(&self) -> Option<T> {
        load(&self.store, &self.key)
    }
}

/// What the host should do when the user tries to leave
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitDecision {
    Proceed,
    Confirm { message: String },
}

struct GuardState {
    dirty: AtomicBool,
    message: String,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    guards: BTreeMap<u64, Arc<GuardState>>,
}

/// Registry of exit interceptors, consulted on page exit.
///
/// Clones share the registry.
#[derive(Clone, Default)]
pub struct ExitHooks {
    registry: Arc<Mutex<Registry>>,
}

impl ExitHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every installed guard; the oldest dirty one decides
    pub fn request_exit(&self) -> ExitDecision {
        let registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        registry
            .guards
            .values()
            .find(|g| g.dirty.load(Ordering::SeqCst))
            .map(|g| ExitDecision::Confirm {
                message: g.message.clone(),
            })
            .unwrap_or(ExitDecision::Proceed)
    }

    /// Installed guards, dirty or not
    pub fn guard_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .guards
            .len()
    }
}

/// Requests confirmation on exit while there are unsaved changes.
///
/// Deregisters itself when dropped.
pub struct UnsavedChangesGuard {
    hooks: ExitHooks,
    id: u64,
    state: Arc<GuardState>,
}

impl UnsavedChangesGuard {
    /// Install a clean guard
    pub fn install(hooks: &ExitHooks, message: impl Into<String>) -> Self {
        let state = Arc::new(GuardState {
            dirty: AtomicBool::new(false),
            message: message.into(),
        });
        let id = {
            let mut registry = hooks.registry.lock().unwrap_or_else(|e| e.into_inner());
            registry.next_id += 1;
            let id = registry.next_id;
            registry.guards.insert(id, Arc::clone(&state));
            id
        };
        Self {
            hooks: hooks.clone(),
            id,
            state,
        }
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.state.dirty.store(dirty, Ordering::SeqCst);
    }

    pub fn is_dirty(&self) -> bool {
        self.state.dirty.load(Ordering::SeqCst)
    }
}

impl Drop for UnsavedChangesGuard {
    fn drop(&mut self) {
        self.hooks
            .registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .guards
            .remove(&self.id);
    }
}

#[cfg(test)]
#[path = "autosave_tests.rs"]
mod tests;
