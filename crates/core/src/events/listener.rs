// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named listener: publish/subscribe channel for diagnostic events

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;

use crate::channel::EventKind;
use crate::payload::Payload;

use super::subscription::{SubscriberId, Subscription};

/// A published diagnostic event.
///
/// The kind travels with the channel name so consumers dispatch on the
/// closed enum instead of re-parsing the name.
#[derive(Debug, Clone)]
pub struct DbEvent {
    pub channel: String,
    pub kind: EventKind,
    pub payload: Payload,
}

/// Sender for event delivery
pub type EventSender = mpsc::UnboundedSender<DbEvent>;
/// Receiver for event delivery
pub type EventReceiver = mpsc::UnboundedReceiver<DbEvent>;

/// A named listener routing events to matching subscribers.
///
/// Delivery is fire-and-forget: a subscriber that dropped its receiver
/// never fails a publish. Clones share the same subscriber table.
pub struct Listener {
    name: Arc<str>,
    subscribers: Arc<RwLock<HashMap<SubscriberId, (Subscription, EventSender)>>>,
}

impl Listener {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            subscribers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cheap check whether any subscription matches the channel.
    ///
    /// Emitters call this before building a payload; the whole point is
    /// paying for payload construction only when someone is watching.
    pub fn is_enabled(&self, channel: &str) -> bool {
        let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        subs.values().any(|(sub, _)| sub.matches(channel))
    }

    /// Subscribe to channels matching the given patterns.
    /// Returns a receiver for events.
    pub fn subscribe(&self, subscription: Subscription) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = subscription.id.clone();

        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.insert(id, (subscription, tx));

        rx
    }

    /// Unsubscribe; closes the subscriber's receiver
    pub fn unsubscribe(&self, id: &SubscriberId) {
        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.remove(id);
    }

    /// Publish an event to all matching subscribers
    pub fn publish(&self, event: DbEvent) {
        let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        for (subscription, tx) in subs.values() {
            if subscription.matches(&event.channel) {
                let _ = tx.send(event.clone());
            }
        }
    }

    /// Get count of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl Clone for Listener {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}
