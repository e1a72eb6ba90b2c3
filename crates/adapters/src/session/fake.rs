// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake session provider for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::SessionProvider;
use af_core::Actor;
use std::sync::{Arc, Mutex};

/// Session provider whose actor can be swapped mid-test
#[derive(Clone, Default)]
pub struct FakeSessionProvider {
    actor: Arc<Mutex<Option<Actor>>>,
}

impl FakeSessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(actor: Actor) -> Self {
        let provider = Self::default();
        provider.sign_in(actor);
        provider
    }

    pub fn sign_in(&self, actor: Actor) {
        *self.actor.lock().unwrap_or_else(|e| e.into_inner()) = Some(actor);
    }

    pub fn sign_out(&self) {
        *self.actor.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl SessionProvider for FakeSessionProvider {
    fn current(&self) -> Option<Actor> {
        self.actor.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
