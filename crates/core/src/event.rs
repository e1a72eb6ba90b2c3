// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events published for observers of the workflow and the resilience layer

use crate::request::RequestId;
use crate::status::RequestStatus;
use crate::workflow::WorkflowAction;
use serde::{Deserialize, Serialize};

/// Something observers may want to react to (toasts, audit, monitoring)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // Workflow events
    RequestTransitioned {
        id: RequestId,
        action: WorkflowAction,
        from: RequestStatus,
        to: RequestStatus,
    },

    // Retry events
    /// An operation succeeded after at least one failed attempt
    RetryRecovered {
        label: String,
        attempts: u32,
    },
    /// Every attempt failed; fired once per run
    RetryExhausted {
        label: String,
        attempts: u32,
        error: String,
    },

    // Optimistic update events
    UpdateCommitted {
        label: String,
    },
    UpdateRolledBack {
        label: String,
        error: String,
    },

    // Auto-save events
    AutosavePersisted {
        key: String,
    },
    AutosaveFailed {
        key: String,
        error: String,
    },

    // Access events
    AccessDenied {
        required: String,
        redirect_to: String,
    },
}

impl Event {
    /// Get the event name for pattern matching
    pub fn name(&self) -> String {
        match self {
            Event::RequestTransitioned { .. } => "request:transitioned".to_string(),
            Event::RetryRecovered { .. } => "retry:recovered".to_string(),
            Event::RetryExhausted { .. } => "retry:exhausted".to_string(),
            Event::UpdateCommitted { .. } => "update:committed".to_string(),
            Event::UpdateRolledBack { .. } => "update:rolled_back".to_string(),
            Event::AutosavePersisted { .. } => "autosave:persisted".to_string(),
            Event::AutosaveFailed { .. } => "autosave:failed".to_string(),
            Event::AccessDenied { .. } => "access:denied".to_string(),
        }
    }
}
