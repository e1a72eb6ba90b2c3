// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Approval workflow engine
//!
//! Pure decision logic: given a request's unit, its status and the acting
//! role, decide which status it moves to and whether the actor may move it.
//!
//! Requests of central-approval units pass two stages (unit admin, then
//! central admin). Requests of every other unit are finished by the unit
//! admin. The central admin may finish any request.

use crate::clock::Clock;
use crate::request::{Request, RequestId};
use crate::role::{Role, RoleClaim};
use crate::status::RequestStatus;
use crate::unit::{CentralApprovalUnits, UnitCategory, UnitId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// What to do with a role name the engine does not recognize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownRolePolicy {
    /// Degrade to the least-privileged branch
    #[default]
    Permissive,
    /// Fail closed with `WorkflowError::UnknownRole`
    Reject,
}

/// The current-session pair: who is acting, and for which unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub role: RoleClaim,
    pub unit_id: Option<UnitId>,
}

impl Actor {
    pub fn new(role: impl Into<RoleClaim>, unit_id: Option<UnitId>) -> Self {
        Self {
            role: role.into(),
            unit_id,
        }
    }

    /// An actor without a unit belongs to no unit, not to unit-less requests
    fn belongs_to(&self, unit: Option<UnitId>) -> bool {
        self.unit_id.is_some() && self.unit_id == unit
    }
}

/// An action a user takes on a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    Submit,
    Approve,
    ReturnToUnit,
    ReturnToUser,
    Reject,
    Resubmit,
}

impl WorkflowAction {
    pub const ALL: [WorkflowAction; 6] = [
        WorkflowAction::Submit,
        WorkflowAction::Approve,
        WorkflowAction::ReturnToUnit,
        WorkflowAction::ReturnToUser,
        WorkflowAction::Reject,
        WorkflowAction::Resubmit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowAction::Submit => "submit",
            WorkflowAction::Approve => "approve",
            WorkflowAction::ReturnToUnit => "return_to_unit",
            WorkflowAction::ReturnToUser => "return_to_user",
            WorkflowAction::Reject => "reject",
            WorkflowAction::Resubmit => "resubmit",
        }
    }
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("{role} may not {action} request {request_id}: {reason}")]
    AuthorizationDenied {
        request_id: RequestId,
        role: RoleClaim,
        action: WorkflowAction,
        reason: &'static str,
    },
    #[error("cannot {action} request {request_id} in status {from}")]
    InvalidTransition {
        request_id: RequestId,
        from: RequestStatus,
        action: WorkflowAction,
    },
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// A validated status change
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The request after the change
    pub request: Request,
    pub from: RequestStatus,
    pub to: RequestStatus,
    pub action: WorkflowAction,
}

/// Approval workflow engine over an injected unit partition
#[derive(Debug, Clone, Default)]
pub struct WorkflowEngine {
    central_units: CentralApprovalUnits,
    unknown_role: UnknownRolePolicy,
}

impl WorkflowEngine {
    pub fn new(central_units: CentralApprovalUnits, unknown_role: UnknownRolePolicy) -> Self {
        Self {
            central_units,
            unknown_role,
        }
    }

    pub fn central_units(&self) -> &CentralApprovalUnits {
        &self.central_units
    }

    pub fn unknown_role_policy(&self) -> UnknownRolePolicy {
        self.unknown_role
    }

    pub fn category(&self, unit_id: Option<UnitId>) -> UnitCategory {
        self.central_units.category(unit_id)
    }

    /// True iff the unit's requests need a central approval stage
    pub fn requires_central_approval(&self, unit_id: Option<UnitId>) -> bool {
        self.central_units.contains(unit_id)
    }

    /// True iff the unit admin is the terminal approver for this unit
    pub fn can_unit_admin_final_approve(&self, unit_id: Option<UnitId>) -> bool {
        !self.central_units.contains(unit_id)
    }

    /// Status an approval by `acting_role` moves a request of `unit_id` to.
    ///
    /// Never fails: roles without approval authority, including unknown
    /// ones, yield `submitted`.
    pub fn compute_next_status(
        &self,
        unit_id: Option<UnitId>,
        acting_role: &RoleClaim,
    ) -> RequestStatus {
        match acting_role.known() {
            Some(Role::CentralAdmin) => RequestStatus::ApprovedFinal,
            Some(Role::UnitAdmin) => {
                if self.requires_central_approval(unit_id) {
                    RequestStatus::ApprovedByUnit
                } else {
                    RequestStatus::ApprovedFinal
                }
            }
            Some(Role::UnitMember) | None => RequestStatus::Submitted,
        }
    }

    /// Like `compute_next_status`, but honours the unknown-role policy
    pub fn try_next_status(
        &self,
        unit_id: Option<UnitId>,
        acting_role: &RoleClaim,
    ) -> Result<RequestStatus, WorkflowError> {
        self.check_role(acting_role)?;
        Ok(self.compute_next_status(unit_id, acting_role))
    }

    /// Certificate gate. The same check must run on any server-side mirror.
    pub fn can_generate_certificate(
        &self,
        unit_id: Option<UnitId>,
        status: RequestStatus,
        role: Option<&RoleClaim>,
        acting_unit_id: Option<UnitId>,
    ) -> bool {
        if status != RequestStatus::ApprovedFinal {
            return false;
        }
        match role.and_then(RoleClaim::known) {
            Some(Role::CentralAdmin) => self.requires_central_approval(unit_id),
            Some(Role::UnitAdmin) => {
                self.can_unit_admin_final_approve(unit_id)
                    && acting_unit_id.is_some()
                    && acting_unit_id == unit_id
            }
            Some(Role::UnitMember) | None => false,
        }
    }

    /// Validate `action` by `actor` and produce the moved request
    pub fn transition(
        &self,
        request: &Request,
        action: WorkflowAction,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<Transition, WorkflowError> {
        let from = request.status();
        let to = match self.resolve(request, action, actor) {
            Ok(to) => to,
            Err(e) => {
                tracing::debug!(
                    request_id = %request.id,
                    role = %actor.role,
                    action = %action,
                    error = %e,
                    "transition refused"
                );
                return Err(e);
            }
        };

        tracing::info!(
            request_id = %request.id,
            role = %actor.role,
            action = %action,
            %from,
            %to,
            "request transitioned"
        );

        Ok(Transition {
            request: request.with_status(to, clock.now()),
            from,
            to,
            action,
        })
    }

    /// Actions `transition` would accept for this actor
    pub fn available_actions(&self, request: &Request, actor: &Actor) -> Vec<WorkflowAction> {
        WorkflowAction::ALL
            .into_iter()
            .filter(|action| self.resolve(request, *action, actor).is_ok())
            .collect()
    }

    fn check_role(&self, role: &RoleClaim) -> Result<(), WorkflowError> {
        match (role, self.unknown_role) {
            (RoleClaim::Unknown(name), UnknownRolePolicy::Reject) => {
                Err(WorkflowError::UnknownRole(name.clone()))
            }
            _ => Ok(()),
        }
    }

    fn resolve(
        &self,
        request: &Request,
        action: WorkflowAction,
        actor: &Actor,
    ) -> Result<RequestStatus, WorkflowError> {
        self.check_role(&actor.role)?;

        let from = request.status();
        let invalid = || WorkflowError::InvalidTransition {
            request_id: request.id.clone(),
            from,
            action,
        };
        let denied = |reason: &'static str| WorkflowError::AuthorizationDenied {
            request_id: request.id.clone(),
            role: actor.role.clone(),
            action,
            reason,
        };

        if from.is_terminal() {
            return Err(invalid());
        }

        let role = actor.role.known();
        let own_unit = actor.belongs_to(request.unit_id);

        match action {
            WorkflowAction::Submit => match from {
                RequestStatus::Draft => Ok(RequestStatus::Submitted),
                _ => Err(invalid()),
            },

            WorkflowAction::Resubmit => match from {
                RequestStatus::ReturnedToUser => Ok(RequestStatus::Submitted),
                RequestStatus::ReturnedToUnit => match role {
                    Some(Role::CentralAdmin) => Ok(RequestStatus::Submitted),
                    Some(Role::UnitAdmin) if own_unit => Ok(RequestStatus::Submitted),
                    Some(Role::UnitAdmin) => Err(denied("request belongs to another unit")),
                    _ => Err(denied("only the unit admin may resubmit a returned unit request")),
                },
                _ => Err(invalid()),
            },

            WorkflowAction::Approve => {
                if !from.awaits_decision() {
                    return Err(invalid());
                }
                match role {
                    Some(Role::CentralAdmin) => {}
                    Some(Role::UnitAdmin) => {
                        if from != RequestStatus::Submitted {
                            return Err(invalid());
                        }
                        if !own_unit {
                            return Err(denied("request belongs to another unit"));
                        }
                    }
                    _ => return Err(denied("no approval authority")),
                }
                Ok(self.compute_next_status(request.unit_id, &actor.role))
            }

            WorkflowAction::ReturnToUser | WorkflowAction::Reject => {
                if !from.awaits_decision() {
                    return Err(invalid());
                }
                match role {
                    Some(Role::CentralAdmin) => {}
                    Some(Role::UnitAdmin) => {
                        if from != RequestStatus::Submitted {
                            return Err(denied("request is awaiting central approval"));
                        }
                        if !own_unit {
                            return Err(denied("request belongs to another unit"));
                        }
                    }
                    _ => return Err(denied("no approval authority")),
                }
                Ok(match action {
                    WorkflowAction::Reject => RequestStatus::Rejected,
                    _ => RequestStatus::ReturnedToUser,
                })
            }

            WorkflowAction::ReturnToUnit => {
                if from != RequestStatus::ApprovedByUnit {
                    return Err(invalid());
                }
                match role {
                    Some(Role::CentralAdmin) => Ok(RequestStatus::ReturnedToUnit),
                    _ => Err(denied("only the central admin may return a request to its unit")),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
