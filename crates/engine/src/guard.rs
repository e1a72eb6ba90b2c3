// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Role guard for protected views and actions
//!
//! `check` only answers; `enforce` runs the same predicate and, on denial,
//! redirects to the fallback path.

use af_adapters::{Navigator, SessionProvider};
use af_core::config::GuardSection;
use af_core::{has_required_role, Event, EventBus, RoleClaim, RoleRequirement};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardResult {
    Allowed,
    Redirected { to: String },
}

impl GuardResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardResult::Allowed)
    }
}

pub struct RoleGuard<N> {
    required: RoleRequirement,
    fallback_path: String,
    navigator: N,
    bus: EventBus,
}

impl<N: Navigator> RoleGuard<N> {
    pub fn new(required: impl Into<RoleRequirement>, navigator: N, bus: EventBus) -> Self {
        Self::from_config(required, &GuardSection::default(), navigator, bus)
    }

    pub fn from_config(
        required: impl Into<RoleRequirement>,
        section: &GuardSection,
        navigator: N,
        bus: EventBus,
    ) -> Self {
        Self {
            required: required.into(),
            fallback_path: section.fallback_path.clone(),
            navigator,
            bus,
        }
    }

    pub fn required(&self) -> &RoleRequirement {
        &self.required
    }

    pub fn fallback_path(&self) -> &str {
        &self.fallback_path
    }

    /// Non-blocking check for conditional rendering
    pub fn check(&self, role: Option<&RoleClaim>) -> bool {
        has_required_role(role, &self.required)
    }

    /// Blocking check: redirects (replacing history) on denial
    pub fn enforce(&self, role: Option<&RoleClaim>) -> GuardResult {
        if self.check(role) {
            return GuardResult::Allowed;
        }

        let required = self.required.to_string();
        tracing::warn!(
            required = %required,
            role = ?role.map(|r| r.to_string()),
            redirect_to = %self.fallback_path,
            "access denied"
        );
        self.navigator.navigate(&self.fallback_path, true);
        self.bus.publish(Event::AccessDenied {
            required,
            redirect_to: self.fallback_path.clone(),
        });
        GuardResult::Redirected {
            to: self.fallback_path.clone(),
        }
    }

    /// `enforce` for whoever the session says is signed in
    pub fn enforce_session(&self, session: &impl SessionProvider) -> GuardResult {
        let actor = session.current();
        self.enforce(actor.as_ref().map(|a| &a.role))
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
