// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event payload shapes
//!
//! Payloads carry identifiers and outcome, never live resource handles,
//! so they can be cloned across subscriber channels and serialized into
//! monitoring pipelines.

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::error::DriverError;
use crate::id::{ConnectionId, OperationId, TransactionId};

/// Transaction isolation level reported on transaction events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
    Snapshot,
}

impl std::fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IsolationLevel::ReadUncommitted => "read-uncommitted",
            IsolationLevel::ReadCommitted => "read-committed",
            IsolationLevel::RepeatableRead => "repeatable-read",
            IsolationLevel::Serializable => "serializable",
            IsolationLevel::Snapshot => "snapshot",
        };
        f.write_str(name)
    }
}

/// Payload for connection open/close events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPayload {
    pub operation_id: OperationId,
    /// Caller-supplied label for the instrumented operation
    pub operation: String,
    pub connection_id: ConnectionId,
    /// Driver-reported client library version, when available
    pub client_version: Option<String>,
    pub timestamp: Timestamp,
    /// Present only on the error leg of the triad
    pub error: Option<DriverError>,
}

/// Payload for command execution events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPayload {
    pub operation_id: OperationId,
    pub operation: String,
    pub connection_id: ConnectionId,
    /// The command text as the driver will receive it
    pub command_text: String,
    /// Set when the command runs inside a transaction
    pub transaction_id: Option<TransactionId>,
    pub timestamp: Timestamp,
    pub error: Option<DriverError>,
}

/// Payload for transaction commit/rollback events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub operation_id: OperationId,
    pub operation: String,
    pub isolation: IsolationLevel,
    pub connection_id: ConnectionId,
    pub transaction_id: TransactionId,
    pub timestamp: Timestamp,
    pub error: Option<DriverError>,
}

/// One of the three payload shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    Connection(ConnectionPayload),
    Command(CommandPayload),
    Transaction(TransactionPayload),
}

impl Payload {
    pub fn operation_id(&self) -> OperationId {
        match self {
            Payload::Connection(p) => p.operation_id,
            Payload::Command(p) => p.operation_id,
            Payload::Transaction(p) => p.operation_id,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            Payload::Connection(p) => p.timestamp,
            Payload::Command(p) => p.timestamp,
            Payload::Transaction(p) => p.timestamp,
        }
    }

    pub fn error(&self) -> Option<&DriverError> {
        match self {
            Payload::Connection(p) => p.error.as_ref(),
            Payload::Command(p) => p.error.as_ref(),
            Payload::Transaction(p) => p.error.as_ref(),
        }
    }
}
