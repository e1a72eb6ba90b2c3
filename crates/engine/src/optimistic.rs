// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optimistic state cell with automatic rollback
//!
//! `update` shows the candidate value immediately, commits it remotely and
//! then either adopts the committed value or restores the exact pre-update
//! snapshot. An update dropped mid-commit also restores the snapshot.
//! Each update (and each `set` or `rollback`) starts a new
//! session; a resolution or rollback handle from an older session never
//! touches the cell.

use af_core::{Event, EventBus};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::watch;

/// What observers see
#[derive(Debug, Clone, PartialEq)]
pub struct Observed<T> {
    pub value: T,
    /// True from the optimistic write until the commit settles
    pub updating: bool,
}

struct Sessions<T> {
    current: u64,
    snapshot: Option<T>,
}

struct Shared<T> {
    label: String,
    state: watch::Sender<Observed<T>>,
    sessions: Mutex<Sessions<T>>,
    bus: EventBus,
}

impl<T: Clone> Shared<T> {
    /// Restore `snapshot` if `session` is still current
    fn restore(&self, session: u64, snapshot: &T) -> bool {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        if sessions.current != session {
            return false;
        }
        self.state.send_replace(Observed {
            value: snapshot.clone(),
            updating: false,
        });
        true
    }
}

/// Restores the snapshot if an update is dropped before its commit settles
struct PendingCommit<'a, T: Clone> {
    shared: &'a Shared<T>,
    session: u64,
    snapshot: &'a T,
    armed: bool,
}

impl<T: Clone> Drop for PendingCommit<'_, T> {
    fn drop(&mut self) {
        if self.armed && self.shared.restore(self.session, self.snapshot) {
            tracing::warn!(label = %self.shared.label, "update abandoned, rolled back");
        }
    }
}

/// Undo for a failed update; a no-op once a newer session started
#[derive(Clone)]
pub struct RollbackHandle {
    apply: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl RollbackHandle {
    /// Restore the pre-update snapshot. Returns false when a newer session
    /// owns the cell and nothing was changed.
    pub fn rollback(&self) -> bool {
        (self.apply)()
    }
}

impl fmt::Debug for RollbackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollbackHandle").finish_non_exhaustive()
    }
}

/// A failed commit. The cell is already restored when this is returned.
#[derive(Debug)]
pub struct UpdateFailure<E> {
    pub error: E,
    pub rollback: RollbackHandle,
}

impl<E: fmt::Display> fmt::Display for UpdateFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

#[derive(Debug, Error)]
pub enum UpdateError<E> {
    #[error("an update is already in progress")]
    Busy,
    #[error("commit failed: {0}")]
    Failed(UpdateFailure<E>),
}

impl<E> UpdateError<E> {
    pub fn into_failure(self) -> Option<UpdateFailure<E>> {
        match self {
            UpdateError::Failed(failure) => Some(failure),
            UpdateError::Busy => None,
        }
    }
}

/// Observable value updated optimistically against a remote commit.
///
/// Clones share the same cell.
pub struct OptimisticUpdater<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for OptimisticUpdater<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OptimisticUpdater<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimisticUpdater")
            .field("label", &self.shared.label)
            .field("state", &*self.shared.state.borrow())
            .finish()
    }
}

impl<T> OptimisticUpdater<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(label: impl Into<String>, initial: T, bus: EventBus) -> Self {
        let (state, _) = watch::channel(Observed {
            value: initial,
            updating: false,
        });
        Self {
            shared: Arc::new(Shared {
                label: label.into(),
                state,
                sessions: Mutex::new(Sessions {
                    current: 0,
                    snapshot: None,
                }),
                bus,
            }),
        }
    }

    pub fn label(&self) -> &str {
        &self.shared.label
    }

    pub fn current(&self) -> Observed<T> {
        self.shared.state.borrow().clone()
    }

    pub fn value(&self) -> T {
        self.shared.state.borrow().value.clone()
    }

    pub fn is_updating(&self) -> bool {
        self.shared.state.borrow().updating
    }

    pub fn subscribe(&self) -> watch::Receiver<Observed<T>> {
        self.shared.state.subscribe()
    }

    /// Replace the value outside an update, e.g. with a pushed change.
    ///
    /// Refused (returns false) while an update is in flight.
    pub fn set(&self, value: T) -> bool {
        let mut sessions = self.shared.sessions.lock().unwrap_or_else(|e| e.into_inner());
        if self.shared.state.borrow().updating {
            return false;
        }
        sessions.current += 1;
        sessions.snapshot = None;
        self.shared.state.send_replace(Observed {
            value,
            updating: false,
        });
        true
    }

    /// Restore the latest snapshot, if any, and clear `updating`.
    ///
    /// Safe to call at any time. An in-flight commit that settles later is
    /// ignored.
    pub fn rollback(&self) {
        let mut sessions = self.shared.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.current += 1;
        let snapshot = sessions.snapshot.clone();
        self.shared.state.send_modify(|observed| {
            if let Some(snapshot) = snapshot {
                observed.value = snapshot;
            }
            observed.updating = false;
        });
        tracing::debug!(label = %self.shared.label, "rolled back");
    }

    /// Apply `candidate` optimistically and commit it
    pub async fn update<E, F, Fut>(&self, candidate: T, commit: F) -> Result<T, UpdateError<E>>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let (session, snapshot) = {
            let mut sessions = self.shared.sessions.lock().unwrap_or_else(|e| e.into_inner());
            if self.shared.state.borrow().updating {
                tracing::warn!(label = %self.shared.label, "update refused, one is in flight");
                return Err(UpdateError::Busy);
            }
            let snapshot = self.shared.state.borrow().value.clone();
            sessions.current += 1;
            sessions.snapshot = Some(snapshot.clone());
            self.shared.state.send_replace(Observed {
                value: candidate.clone(),
                updating: true,
            });
            (sessions.current, snapshot)
        };

        let label = self.shared.label.clone();
        let mut pending = PendingCommit {
            shared: &self.shared,
            session,
            snapshot: &snapshot,
            armed: true,
        };
        let result = commit(candidate).await;
        pending.armed = false;
        drop(pending);

        match result {
            Ok(committed) => {
                let mut sessions =
                    self.shared.sessions.lock().unwrap_or_else(|e| e.into_inner());
                if sessions.current != session {
                    tracing::warn!(label = %label, "commit settled after rollback, ignored");
                    return Ok(committed);
                }
                sessions.snapshot = None;
                self.shared.state.send_replace(Observed {
                    value: committed.clone(),
                    updating: false,
                });
                drop(sessions);

                tracing::info!(label = %label, "update committed");
                self.shared.bus.publish(Event::UpdateCommitted { label });
                Ok(committed)
            }
            Err(error) => {
                let restored = self.shared.restore(session, &snapshot);
                let message = error.to_string();
                tracing::warn!(label = %label, restored, error = %message, "update rolled back");
                self.shared.bus.publish(Event::UpdateRolledBack {
                    label,
                    error: message,
                });

                let shared = Arc::clone(&self.shared);
                let rollback = RollbackHandle {
                    apply: Arc::new(move || shared.restore(session, &snapshot)),
                };
                Err(UpdateError::Failed(UpdateFailure { error, rollback }))
            }
        }
    }
}

#[cfg(test)]
#[path = "optimistic_tests.rs"]
mod tests;
