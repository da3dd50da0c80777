// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observer: bridges the event hub to typed handler callbacks
//!
//! The observer watches the hub for the diagnostic listener, subscribes
//! to every channel on it, and dispatches each event to the handler
//! method matching its kind. Dispatch is an exhaustive match over the
//! closed kind set; an event whose payload family does not fit its kind
//! is dropped with a debug log.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;

use crate::channel::EventKind;
use crate::error::DiagnosticsError;
use crate::events::{DbEvent, EventHub, Listener, SubscriberId, Subscription};
use crate::payload::{CommandPayload, ConnectionPayload, Payload, TransactionPayload};
use crate::source::DB_LISTENER;

/// Typed callbacks for diagnostic events.
///
/// Every method has an empty default body; implementors override only
/// the kinds they care about.
pub trait DbEventHandler: Send + Sync + 'static {
    /// Raw filter hook, called before typed dispatch.
    ///
    /// Return `true` to consume the event and skip the typed methods.
    /// The default consumes nothing except events with a blank channel,
    /// which are dropped outright.
    fn on_event(&self, event: &DbEvent) -> bool {
        event.channel.trim().is_empty()
    }

    fn connection_opening(&self, _payload: &ConnectionPayload) {}
    fn connection_opened(&self, _payload: &ConnectionPayload) {}
    fn connection_opening_error(&self, _payload: &ConnectionPayload) {}
    fn connection_closing(&self, _payload: &ConnectionPayload) {}
    fn connection_closed(&self, _payload: &ConnectionPayload) {}
    fn connection_closing_error(&self, _payload: &ConnectionPayload) {}
    fn command_executing(&self, _payload: &CommandPayload) {}
    fn command_executed(&self, _payload: &CommandPayload) {}
    fn command_executing_error(&self, _payload: &CommandPayload) {}
    fn transaction_committing(&self, _payload: &TransactionPayload) {}
    fn transaction_committed(&self, _payload: &TransactionPayload) {}
    fn transaction_committing_error(&self, _payload: &TransactionPayload) {}
    fn transaction_rolling_back(&self, _payload: &TransactionPayload) {}
    fn transaction_rolled_back(&self, _payload: &TransactionPayload) {}
    fn transaction_rolling_back_error(&self, _payload: &TransactionPayload) {}
}

/// Observer lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    Created,
    Started,
    Stopped,
    Disposed,
}

struct Inner {
    state: ObserverState,
    tasks: Vec<JoinHandle<()>>,
    subscriptions: Vec<(Listener, SubscriberId)>,
    next_sub: u64,
}

/// Subscribes a handler to the hub's diagnostic listener.
///
/// Lifecycle is Created -> Started -> Stopped -> Disposed; a stopped
/// observer may be started again, a disposed one may not.
pub struct DbObserver<H: DbEventHandler> {
    handler: Arc<H>,
    inner: Arc<Mutex<Inner>>,
}

impl<H: DbEventHandler> DbObserver<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
            inner: Arc::new(Mutex::new(Inner {
                state: ObserverState::Created,
                tasks: Vec::new(),
                subscriptions: Vec::new(),
                next_sub: 0,
            })),
        }
    }

    /// Shared handle to the handler
    pub fn handler(&self) -> Arc<H> {
        Arc::clone(&self.handler)
    }

    pub fn state(&self) -> ObserverState {
        lock(&self.inner).state
    }

    /// Begin observing the hub.
    ///
    /// Watches listener announcements and subscribes to the diagnostic
    /// listener whenever it appears, existing or future. Must run inside
    /// a tokio runtime.
    pub fn start(&self, hub: &EventHub) -> Result<(), DiagnosticsError> {
        let mut inner = lock(&self.inner);
        match inner.state {
            ObserverState::Disposed => return Err(DiagnosticsError::Disposed),
            ObserverState::Started => {
                return Err(DiagnosticsError::InvalidOperation(
                    "observer is already started".to_string(),
                ));
            }
            ObserverState::Created | ObserverState::Stopped => {}
        }
        inner.state = ObserverState::Started;

        let mut announcements = hub.observe_listeners();
        let handler = Arc::clone(&self.handler);
        let shared = Arc::clone(&self.inner);
        let watch = tokio::spawn(async move {
            while let Some(listener) = announcements.recv().await {
                if listener.name() != DB_LISTENER {
                    continue;
                }
                Self::attach(&shared, &handler, listener);
            }
        });
        inner.tasks.push(watch);

        tracing::debug!("observer started");
        Ok(())
    }

    /// Stop observing; unsubscribes everything and halts dispatch
    pub fn stop(&self) -> Result<(), DiagnosticsError> {
        let mut inner = lock(&self.inner);
        if inner.state == ObserverState::Disposed {
            return Err(DiagnosticsError::Disposed);
        }
        Self::halt(&mut inner);
        inner.state = ObserverState::Stopped;

        tracing::debug!("observer stopped");
        Ok(())
    }

    /// Release the observer. Safe to call more than once.
    pub fn dispose(&self) {
        let mut inner = lock(&self.inner);
        if inner.state == ObserverState::Disposed {
            return;
        }
        Self::halt(&mut inner);
        inner.state = ObserverState::Disposed;

        tracing::debug!("observer disposed");
    }

    fn attach(shared: &Arc<Mutex<Inner>>, handler: &Arc<H>, listener: Listener) {
        let mut inner = lock(shared);
        if inner.state != ObserverState::Started {
            return;
        }
        inner.next_sub += 1;
        let sub_id = format!("db-observer-{}", inner.next_sub);

        let mut rx = listener.subscribe(Subscription::all(&*sub_id, "database event observer"));
        inner
            .subscriptions
            .push((listener, SubscriberId(sub_id)));

        let handler = Arc::clone(handler);
        let dispatch = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if handler.on_event(&event) {
                    continue;
                }
                dispatch_event(&*handler, &event.kind, &event.payload);
            }
        });
        inner.tasks.push(dispatch);
    }

    fn halt(inner: &mut Inner) {
        for (listener, id) in inner.subscriptions.drain(..) {
            listener.unsubscribe(&id);
        }
        for task in inner.tasks.drain(..) {
            task.abort();
        }
    }
}

impl<H: DbEventHandler> Drop for DbObserver<H> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn lock(inner: &Arc<Mutex<Inner>>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

fn dispatch_event<H: DbEventHandler>(handler: &H, kind: &EventKind, payload: &Payload) {
    match (kind, payload) {
        (EventKind::ConnectionOpening, Payload::Connection(p)) => handler.connection_opening(p),
        (EventKind::ConnectionOpened, Payload::Connection(p)) => handler.connection_opened(p),
        (EventKind::ConnectionOpeningError, Payload::Connection(p)) => {
            handler.connection_opening_error(p);
        }
        (EventKind::ConnectionClosing, Payload::Connection(p)) => handler.connection_closing(p),
        (EventKind::ConnectionClosed, Payload::Connection(p)) => handler.connection_closed(p),
        (EventKind::ConnectionClosingError, Payload::Connection(p)) => {
            handler.connection_closing_error(p);
        }
        (EventKind::CommandExecuting, Payload::Command(p)) => handler.command_executing(p),
        (EventKind::CommandExecuted, Payload::Command(p)) => handler.command_executed(p),
        (EventKind::CommandExecutingError, Payload::Command(p)) => {
            handler.command_executing_error(p);
        }
        (EventKind::TransactionCommitting, Payload::Transaction(p)) => {
            handler.transaction_committing(p);
        }
        (EventKind::TransactionCommitted, Payload::Transaction(p)) => {
            handler.transaction_committed(p);
        }
        (EventKind::TransactionCommittingError, Payload::Transaction(p)) => {
            handler.transaction_committing_error(p);
        }
        (EventKind::TransactionRollingBack, Payload::Transaction(p)) => {
            handler.transaction_rolling_back(p);
        }
        (EventKind::TransactionRolledBack, Payload::Transaction(p)) => {
            handler.transaction_rolled_back(p);
        }
        (EventKind::TransactionRollingBackError, Payload::Transaction(p)) => {
            handler.transaction_rolling_back_error(p);
        }
        (kind, _) => {
            tracing::debug!(kind = %kind, "event payload does not match its kind, dropped");
        }
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
