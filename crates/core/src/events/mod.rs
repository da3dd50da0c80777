// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event transport: named listeners with pattern subscriptions
//!
//! This module provides:
//! - `EventHub` - Process-wide registry of named listeners with an
//!   announcement stream for late subscribers
//! - `Listener` - A named publish/subscribe channel with a cheap
//!   `is_enabled` check
//! - `ChannelPattern` - Pattern matching for channel subscriptions

mod hub;
mod listener;
mod subscription;

pub use hub::EventHub;
pub use listener::{DbEvent, EventReceiver, EventSender, Listener};
pub use subscription::{ChannelPattern, SubscriberId, Subscription};
