// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the portal's collaborators: the remote data channel,
//! the current session and the navigator

pub mod channel;
pub mod navigate;
pub mod session;
pub mod traced;

pub use channel::{ChannelError, ChannelReply, DataChannel, RequestChange, RequestChanges};
pub use navigate::{Navigator, NoOpNavigator};
pub use session::{SessionProvider, StaticSession};
pub use traced::TracedDataChannel;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use channel::{ChannelCall, FakeDataChannel};
#[cfg(any(test, feature = "test-support"))]
pub use navigate::{FakeNavigator, Navigation};
#[cfg(any(test, feature = "test-support"))]
pub use session::FakeSessionProvider;
