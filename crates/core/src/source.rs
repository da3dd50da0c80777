// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic source: the before/after/error emission triads
//!
//! One `DiagnosticSource` is shared by every decorated resource of a
//! host. Emission is best-effort and isolated: nothing in here returns
//! an error or panics, so event plumbing can never mask a driver
//! failure that the decorator must rethrow.

use std::sync::Arc;

use crate::channel::{EventKind, PrefixRegistry};
use crate::clock::MonotonicClock;
use crate::error::DriverError;
use crate::events::{DbEvent, EventHub, Listener};
use crate::id::{ConnectionId, OpIdGen, OperationId, TransactionId, UuidOpIdGen};
use crate::payload::{
    CommandPayload, ConnectionPayload, IsolationLevel, Payload, TransactionPayload,
};

/// Name of the listener all diagnostic events flow through
pub const DB_LISTENER: &str = "dbtap";

/// Emitter context shared by decorated resources.
///
/// Holds the listener handle, the prefix registry, the operation-id
/// generator, and the event clock. Constructed once by the host and
/// passed into `instrument_*`; there is no process-global instance.
pub struct DiagnosticSource {
    listener: Listener,
    prefixes: PrefixRegistry,
    op_ids: Arc<dyn OpIdGen>,
    clock: MonotonicClock,
}

impl DiagnosticSource {
    /// Source publishing to the hub's `DB_LISTENER` listener
    pub fn new(hub: &EventHub) -> Self {
        Self::with_parts(
            hub.listener(DB_LISTENER),
            PrefixRegistry::new(),
            Arc::new(UuidOpIdGen),
            MonotonicClock::new(),
        )
    }

    /// Source from explicit parts, used by tests to inject spies
    pub fn with_parts(
        listener: Listener,
        prefixes: PrefixRegistry,
        op_ids: Arc<dyn OpIdGen>,
        clock: MonotonicClock,
    ) -> Self {
        Self {
            listener,
            prefixes,
            op_ids,
            clock,
        }
    }

    /// The prefix registry consulted for channel names
    pub fn prefixes(&self) -> &PrefixRegistry {
        &self.prefixes
    }

    /// The listener events are published to
    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    // =========================================================================
    // Connection open
    // =========================================================================

    pub fn connection_open_before(
        &self,
        tag: &str,
        connection_id: ConnectionId,
        client_version: Option<&str>,
        operation: &str,
    ) -> OperationId {
        let Some(channel) = self.enabled_channel(tag, EventKind::ConnectionOpening) else {
            return OperationId::EMPTY;
        };
        let operation_id = self.op_ids.next();
        self.publish(
            channel,
            EventKind::ConnectionOpening,
            self.connection_payload(operation_id, operation, connection_id, client_version, None),
        );
        operation_id
    }

    pub fn connection_open_after(
        &self,
        operation_id: OperationId,
        tag: &str,
        connection_id: ConnectionId,
        client_version: Option<&str>,
        operation: &str,
    ) {
        if let Some(channel) = self.enabled_channel(tag, EventKind::ConnectionOpened) {
            self.publish(
                channel,
                EventKind::ConnectionOpened,
                self.connection_payload(operation_id, operation, connection_id, client_version, None),
            );
        }
    }

    pub fn connection_open_error(
        &self,
        operation_id: OperationId,
        tag: &str,
        connection_id: ConnectionId,
        client_version: Option<&str>,
        operation: &str,
        error: &DriverError,
    ) {
        if let Some(channel) = self.enabled_channel(tag, EventKind::ConnectionOpeningError) {
            self.publish(
                channel,
                EventKind::ConnectionOpeningError,
                self.connection_payload(
                    operation_id,
                    operation,
                    connection_id,
                    client_version,
                    Some(error.clone()),
                ),
            );
        }
    }

    // =========================================================================
    // Connection close
    // =========================================================================

    pub fn connection_close_before(
        &self,
        tag: &str,
        connection_id: ConnectionId,
        operation: &str,
    ) -> OperationId {
        let Some(channel) = self.enabled_channel(tag, EventKind::ConnectionClosing) else {
            return OperationId::EMPTY;
        };
        let operation_id = self.op_ids.next();
        self.publish(
            channel,
            EventKind::ConnectionClosing,
            self.connection_payload(operation_id, operation, connection_id, None, None),
        );
        operation_id
    }

    pub fn connection_close_after(
        &self,
        operation_id: OperationId,
        tag: &str,
        connection_id: ConnectionId,
        operation: &str,
    ) {
        if let Some(channel) = self.enabled_channel(tag, EventKind::ConnectionClosed) {
            self.publish(
                channel,
                EventKind::ConnectionClosed,
                self.connection_payload(operation_id, operation, connection_id, None, None),
            );
        }
    }

    pub fn connection_close_error(
        &self,
        operation_id: OperationId,
        tag: &str,
        connection_id: ConnectionId,
        operation: &str,
        error: &DriverError,
    ) {
        if let Some(channel) = self.enabled_channel(tag, EventKind::ConnectionClosingError) {
            self.publish(
                channel,
                EventKind::ConnectionClosingError,
                self.connection_payload(
                    operation_id,
                    operation,
                    connection_id,
                    None,
                    Some(error.clone()),
                ),
            );
        }
    }

    // =========================================================================
    // Command execution
    // =========================================================================

    pub fn command_before(
        &self,
        tag: &str,
        connection_id: ConnectionId,
        command_text: &str,
        transaction_id: Option<TransactionId>,
        operation: &str,
    ) -> OperationId {
        let Some(channel) = self.enabled_channel(tag, EventKind::CommandExecuting) else {
            return OperationId::EMPTY;
        };
        let operation_id = self.op_ids.next();
        self.publish(
            channel,
            EventKind::CommandExecuting,
            self.command_payload(
                operation_id,
                operation,
                connection_id,
                command_text,
                transaction_id,
                None,
            ),
        );
        operation_id
    }

    pub fn command_after(
        &self,
        operation_id: OperationId,
        tag: &str,
        connection_id: ConnectionId,
        command_text: &str,
        transaction_id: Option<TransactionId>,
        operation: &str,
    ) {
        if let Some(channel) = self.enabled_channel(tag, EventKind::CommandExecuted) {
            self.publish(
                channel,
                EventKind::CommandExecuted,
                self.command_payload(
                    operation_id,
                    operation,
                    connection_id,
                    command_text,
                    transaction_id,
                    None,
                ),
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn command_error(
        &self,
        operation_id: OperationId,
        tag: &str,
        connection_id: ConnectionId,
        command_text: &str,
        transaction_id: Option<TransactionId>,
        operation: &str,
        error: &DriverError,
    ) {
        if let Some(channel) = self.enabled_channel(tag, EventKind::CommandExecutingError) {
            self.publish(
                channel,
                EventKind::CommandExecutingError,
                self.command_payload(
                    operation_id,
                    operation,
                    connection_id,
                    command_text,
                    transaction_id,
                    Some(error.clone()),
                ),
            );
        }
    }

    // =========================================================================
    // Transaction commit / rollback
    // =========================================================================

    pub fn transaction_commit_before(
        &self,
        tag: &str,
        isolation: IsolationLevel,
        connection_id: ConnectionId,
        transaction_id: TransactionId,
        operation: &str,
    ) -> OperationId {
        self.transaction_before(
            EventKind::TransactionCommitting,
            tag,
            isolation,
            connection_id,
            transaction_id,
            operation,
        )
    }

    pub fn transaction_commit_after(
        &self,
        operation_id: OperationId,
        tag: &str,
        isolation: IsolationLevel,
        connection_id: ConnectionId,
        transaction_id: TransactionId,
        operation: &str,
    ) {
        self.transaction_terminal(
            EventKind::TransactionCommitted,
            operation_id,
            tag,
            isolation,
            connection_id,
            transaction_id,
            operation,
            None,
        );
    }

    #[allow(clippy::too_many_arguments)]
    pub fn transaction_commit_error(
        &self,
        operation_id: OperationId,
        tag: &str,
        isolation: IsolationLevel,
        connection_id: ConnectionId,
        transaction_id: TransactionId,
        operation: &str,
        error: &DriverError,
    ) {
        self.transaction_terminal(
            EventKind::TransactionCommittingError,
            operation_id,
            tag,
            isolation,
            connection_id,
            transaction_id,
            operation,
            Some(error.clone()),
        );
    }

    pub fn transaction_rollback_before(
        &self,
        tag: &str,
        isolation: IsolationLevel,
        connection_id: ConnectionId,
        transaction_id: TransactionId,
        operation: &str,
    ) -> OperationId {
        self.transaction_before(
            EventKind::TransactionRollingBack,
            tag,
            isolation,
            connection_id,
            transaction_id,
            operation,
        )
    }

    pub fn transaction_rollback_after(
        &self,
        operation_id: OperationId,
        tag: &str,
        isolation: IsolationLevel,
        connection_id: ConnectionId,
        transaction_id: TransactionId,
        operation: &str,
    ) {
        self.transaction_terminal(
            EventKind::TransactionRolledBack,
            operation_id,
            tag,
            isolation,
            connection_id,
            transaction_id,
            operation,
            None,
        );
    }

    #[allow(clippy::too_many_arguments)]
    pub fn transaction_rollback_error(
        &self,
        operation_id: OperationId,
        tag: &str,
        isolation: IsolationLevel,
        connection_id: ConnectionId,
        transaction_id: TransactionId,
        operation: &str,
        error: &DriverError,
    ) {
        self.transaction_terminal(
            EventKind::TransactionRollingBackError,
            operation_id,
            tag,
            isolation,
            connection_id,
            transaction_id,
            operation,
            Some(error.clone()),
        );
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn transaction_before(
        &self,
        kind: EventKind,
        tag: &str,
        isolation: IsolationLevel,
        connection_id: ConnectionId,
        transaction_id: TransactionId,
        operation: &str,
    ) -> OperationId {
        let Some(channel) = self.enabled_channel(tag, kind) else {
            return OperationId::EMPTY;
        };
        let operation_id = self.op_ids.next();
        self.publish(
            channel,
            kind,
            self.transaction_payload(
                operation_id,
                operation,
                isolation,
                connection_id,
                transaction_id,
                None,
            ),
        );
        operation_id
    }

    #[allow(clippy::too_many_arguments)]
    fn transaction_terminal(
        &self,
        kind: EventKind,
        operation_id: OperationId,
        tag: &str,
        isolation: IsolationLevel,
        connection_id: ConnectionId,
        transaction_id: TransactionId,
        operation: &str,
        error: Option<DriverError>,
    ) {
        if let Some(channel) = self.enabled_channel(tag, kind) {
            self.publish(
                channel,
                kind,
                self.transaction_payload(
                    operation_id,
                    operation,
                    isolation,
                    connection_id,
                    transaction_id,
                    error,
                ),
            );
        }
    }

    /// Resolve the channel and check for subscribers.
    ///
    /// Returns `None` when emission should be skipped, either because
    /// nobody is listening or because resolution failed; resolution
    /// failures are swallowed here so they can never mask the driver
    /// outcome the decorator is about to return.
    fn enabled_channel(&self, tag: &str, kind: EventKind) -> Option<String> {
        let channel = match self.prefixes.resolve(tag, kind) {
            Ok(channel) => channel,
            Err(err) => {
                tracing::debug!(error = %err, kind = %kind, "skipping event emission");
                return None;
            }
        };
        self.listener.is_enabled(&channel).then_some(channel)
    }

    fn publish(&self, channel: String, kind: EventKind, payload: Payload) {
        self.listener.publish(DbEvent {
            channel,
            kind,
            payload,
        });
    }

    fn connection_payload(
        &self,
        operation_id: OperationId,
        operation: &str,
        connection_id: ConnectionId,
        client_version: Option<&str>,
        error: Option<DriverError>,
    ) -> Payload {
        Payload::Connection(ConnectionPayload {
            operation_id,
            operation: operation.to_string(),
            connection_id,
            client_version: client_version.map(str::to_string),
            timestamp: self.clock.tick(),
            error,
        })
    }

    fn command_payload(
        &self,
        operation_id: OperationId,
        operation: &str,
        connection_id: ConnectionId,
        command_text: &str,
        transaction_id: Option<TransactionId>,
        error: Option<DriverError>,
    ) -> Payload {
        Payload::Command(CommandPayload {
            operation_id,
            operation: operation.to_string(),
            connection_id,
            command_text: command_text.to_string(),
            transaction_id,
            timestamp: self.clock.tick(),
            error,
        })
    }

    fn transaction_payload(
        &self,
        operation_id: OperationId,
        operation: &str,
        isolation: IsolationLevel,
        connection_id: ConnectionId,
        transaction_id: TransactionId,
        error: Option<DriverError>,
    ) -> Payload {
        Payload::Transaction(TransactionPayload {
            operation_id,
            operation: operation.to_string(),
            isolation,
            connection_id,
            transaction_id,
            timestamp: self.clock.tick(),
            error,
        })
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
