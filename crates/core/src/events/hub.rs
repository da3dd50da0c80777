// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event hub: registry of named listeners
//!
//! The hub is the explicit context object standing in for process-wide
//! listener state. The host constructs one and hands it to sources and
//! observers; nothing here is a global.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;

use super::listener::Listener;

/// Registry of named listeners with an announcement stream.
///
/// Observers use `observe_listeners` to see both listeners that already
/// exist and listeners created later, mirroring a process-wide
/// "all listeners" discovery protocol.
pub struct EventHub {
    listeners: Arc<RwLock<HashMap<String, Listener>>>,
    watchers: Arc<RwLock<Vec<mpsc::UnboundedSender<Listener>>>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(RwLock::new(HashMap::new())),
            watchers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Get or create the listener with the given name.
    ///
    /// Creation announces the listener to every watcher.
    pub fn listener(&self, name: &str) -> Listener {
        let created = {
            let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
            if let Some(existing) = listeners.get(name) {
                return existing.clone();
            }
            let listener = Listener::new(name);
            listeners.insert(name.to_string(), listener.clone());
            listener
        };

        tracing::debug!(listener = name, "created listener");
        self.announce(&created);
        created
    }

    /// Observe listener announcements.
    ///
    /// Existing listeners are replayed into the receiver immediately;
    /// listeners created later arrive as they are registered.
    pub fn observe_listeners(&self) -> mpsc::UnboundedReceiver<Listener> {
        let (tx, rx) = mpsc::unbounded_channel();

        let existing: Vec<Listener> = {
            let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
            listeners.values().cloned().collect()
        };
        for listener in existing {
            let _ = tx.send(listener);
        }

        let mut watchers = self.watchers.write().unwrap_or_else(|e| e.into_inner());
        watchers.push(tx);

        rx
    }

    /// Names of all registered listeners
    pub fn listener_names(&self) -> Vec<String> {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }

    fn announce(&self, listener: &Listener) {
        let mut watchers = self.watchers.write().unwrap_or_else(|e| e.into_inner());
        // Drop watchers whose receivers are gone.
        watchers.retain(|tx| tx.send(listener.clone()).is_ok());
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventHub {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
            watchers: Arc::clone(&self.watchers),
        }
    }
}
