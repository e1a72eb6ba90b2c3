// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service requests
//!
//! A request is created in `draft` by its requester. Its status is not
//! publicly writable: only the workflow engine moves it.

use crate::clock::Clock;
use crate::status::RequestStatus;
use crate::unit::UnitId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a request
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId(s.to_string())
    }
}

/// Kind of administrative service requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestCategory {
    Leave,
    Promotion,
    Transfer,
    Pension,
    Other,
}

/// A service case owned by an organizational unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub category: RequestCategory,
    pub unit_id: Option<UnitId>,
    status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Free-form form content
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Request {
    /// Draft a new request
    pub fn draft(
        id: impl Into<RequestId>,
        category: RequestCategory,
        unit_id: Option<UnitId>,
        payload: serde_json::Value,
        clock: &impl Clock,
    ) -> Self {
        let now = clock.now();
        Request {
            id: id.into(),
            category,
            unit_id,
            status: RequestStatus::Draft,
            created_at: now,
            modified_at: now,
            payload,
        }
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Copy of this request moved to `status`, stamped at `now`
    pub(crate) fn with_status(&self, status: RequestStatus, now: DateTime<Utc>) -> Request {
        Request {
            status,
            modified_at: now,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
