// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable key-value storage for in-progress form state
//!
//! One global namespace of caller-supplied string keys. Stores are
//! synchronous, capacity-bounded and fallible.

mod file;
mod kv;
mod memory;

pub use file::FileKvStore;
pub use kv::{load_json, save_json, KvError, KvStore};
pub use memory::MemoryKvStore;
