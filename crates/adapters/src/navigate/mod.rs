// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Navigation side effects

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNavigator, Navigation};

/// Moves the user to another location.
///
/// `replace` swaps the current history entry instead of pushing one.
pub trait Navigator: Clone + Send + Sync + 'static {
    fn navigate(&self, path: &str, replace: bool);
}

/// Navigator that does nothing.
///
/// Used by hosts without a navigation surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpNavigator;

impl NoOpNavigator {
    pub fn new() -> Self {
        Self
    }
}

impl Navigator for NoOpNavigator {
    fn navigate(&self, _path: &str, _replace: bool) {}
}
