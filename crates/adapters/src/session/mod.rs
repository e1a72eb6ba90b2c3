// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Current-session provider

use af_core::Actor;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSessionProvider;

/// Source of the acting (role, unit) pair. `None` means nobody is signed in.
pub trait SessionProvider: Clone + Send + Sync + 'static {
    fn current(&self) -> Option<Actor>;
}

/// Session fixed for the lifetime of the provider
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    actor: Option<Actor>,
}

impl StaticSession {
    pub fn new(actor: Actor) -> Self {
        Self { actor: Some(actor) }
    }

    pub fn anonymous() -> Self {
        Self { actor: None }
    }
}

impl SessionProvider for StaticSession {
    fn current(&self) -> Option<Actor> {
        self.actor.clone()
    }
}
