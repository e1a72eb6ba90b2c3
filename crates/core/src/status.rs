// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request lifecycle statuses

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a request.
///
/// ```text
/// draft → submitted → approved_by_unit → approved_final
///                   ↘ approved_final
///                   ↘ returned_to_user → submitted
///                   ↘ rejected
/// approved_by_unit  ↘ returned_to_unit → submitted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Draft,
    Submitted,
    /// Approved by the unit admin, still awaiting central approval
    ApprovedByUnit,
    ApprovedFinal,
    ReturnedToUnit,
    ReturnedToUser,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Draft => "draft",
            RequestStatus::Submitted => "submitted",
            RequestStatus::ApprovedByUnit => "approved_by_unit",
            RequestStatus::ApprovedFinal => "approved_final",
            RequestStatus::ReturnedToUnit => "returned_to_unit",
            RequestStatus::ReturnedToUser => "returned_to_user",
            RequestStatus::Rejected => "rejected",
        }
    }

    /// No further transition is defined
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::ApprovedFinal | RequestStatus::Rejected)
    }

    /// Sent back for revision and resubmission
    pub fn is_returned(self) -> bool {
        matches!(
            self,
            RequestStatus::ReturnedToUnit | RequestStatus::ReturnedToUser
        )
    }

    /// Waiting on an approver
    pub fn awaits_decision(self) -> bool {
        matches!(
            self,
            RequestStatus::Submitted | RequestStatus::ApprovedByUnit
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown request status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(RequestStatus::Draft),
            "submitted" => Ok(RequestStatus::Submitted),
            "approved_by_unit" => Ok(RequestStatus::ApprovedByUnit),
            "approved_final" => Ok(RequestStatus::ApprovedFinal),
            "returned_to_unit" => Ok(RequestStatus::ReturnedToUnit),
            "returned_to_user" => Ok(RequestStatus::ReturnedToUser),
            "rejected" => Ok(RequestStatus::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
