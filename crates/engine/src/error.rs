// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the approval service

use af_core::{RequestId, WorkflowError};
use thiserror::Error;

/// Errors that can occur acting on a request
#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("no signed-in user")]
    Unauthenticated,
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error("request {0} has an update in flight")]
    Busy(RequestId),
    #[error("saving request {id} failed after {attempts} attempts: {message}")]
    Commit {
        id: RequestId,
        attempts: u32,
        message: String,
    },
    #[error("loading request {id} failed after {attempts} attempts: {message}")]
    Load {
        id: RequestId,
        attempts: u32,
        message: String,
    },
}

impl ApprovalError {
    /// True for failures a retry affordance makes sense for
    pub fn is_transient(&self) -> bool {
        matches!(self, ApprovalError::Commit { .. } | ApprovalError::Load { .. })
    }
}
