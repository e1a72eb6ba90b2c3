// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event routing for observers
//!
//! - `EventBus` - Route events to matching subscribers using patterns
//! - `EventPattern` - Pattern matching on `category:name` event names

mod bus;
mod subscription;

pub use bus::{EventBus, EventReceiver, EventSender};
pub use subscription::{EventPattern, SubscriberId, Subscription};
