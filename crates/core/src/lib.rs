// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! af-core: domain core of the administrative-services portal
//!
//! This crate provides:
//! - Roles, units, statuses and requests
//! - The pure approval workflow engine and certificate gate
//! - Events and the event bus observers subscribe to
//! - Clock and id abstractions
//! - TOML configuration

pub mod clock;
pub mod config;
pub mod event;
pub mod events;
pub mod id;

// Domain (order matters for dependencies)
pub mod role;
pub mod unit;
pub mod status;
pub mod request;
pub mod workflow;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, PortalConfig};
pub use event::Event;
pub use events::{EventBus, EventPattern, EventReceiver, Subscription};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use request::{Request, RequestCategory, RequestId};
pub use role::{has_required_role, Role, RoleClaim, RoleRequirement};
pub use status::RequestStatus;
pub use unit::{CentralApprovalUnits, UnitCategory, UnitId};
pub use workflow::{
    Actor, Transition, UnknownRolePolicy, WorkflowAction, WorkflowEngine, WorkflowError,
};
