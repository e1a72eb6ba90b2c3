// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Resilience layer and approval service
//!
//! Retrying executor, optimistic updater, debounced auto-save with its
//! exit guard, the blocking role guard, and the service that drives a
//! workflow action through them.

mod approval;
pub mod autosave;
pub mod debounce;
mod error;
mod guard;
pub mod optimistic;
pub mod retry;

pub use approval::{ApprovalDeps, ApprovalService};
pub use autosave::{AutoSave, ExitDecision, ExitHooks, UnsavedChangesGuard};
pub use debounce::{Debouncer, Throttle};
pub use error::ApprovalError;
pub use guard::{GuardResult, RoleGuard};
pub use optimistic::{Observed, OptimisticUpdater, RollbackHandle, UpdateError, UpdateFailure};
pub use retry::{RetryError, RetryExecutor, RetryPolicy, RetryState};
