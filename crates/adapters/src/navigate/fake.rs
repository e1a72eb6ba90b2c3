// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake navigator for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::Navigator;
use std::sync::{Arc, Mutex};

/// Recorded navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub path: String,
    pub replace: bool,
}

/// Navigator that records every call
#[derive(Clone, Default)]
pub struct FakeNavigator {
    calls: Arc<Mutex<Vec<Navigation>>>,
}

impl FakeNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded navigations
    pub fn calls(&self) -> Vec<Navigation> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Navigator for FakeNavigator {
    fn navigate(&self, path: &str, replace: bool) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Navigation {
                path: path.to_string(),
                replace,
            });
    }
}
