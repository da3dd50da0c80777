// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Driver-facing resource traits
//!
//! These traits describe the minimal surface the decorators instrument:
//! stable identity, lifecycle operations in sync and async form, and
//! resource creation. They are object safe so drivers and decorators
//! interchange behind `Box<dyn ...>`.
//!
//! `is_instrumented` / `into_inner` carry the wrap protocol: decorators
//! report `true` and return their inner resource, plain drivers keep the
//! defaults. That keeps wrapping idempotent and unwrapping total without
//! any downcasting.

use async_trait::async_trait;

use dbtap_core::{ConnectionId, DriverError, IsolationLevel, TransactionId};

/// Result alias for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Observable connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Closed,
    Open,
}

/// A database connection as the decorators see it
#[async_trait]
pub trait Connection: Send + Sync {
    /// Driver tag used for channel prefix resolution ("sqlite", ...)
    fn type_tag(&self) -> &str;

    /// Identity; stable across wrapping
    fn connection_id(&self) -> ConnectionId;

    fn client_version(&self) -> Option<String>;

    fn state(&self) -> ConnectionState;

    fn open(&mut self) -> DriverResult<()>;

    async fn open_async(&mut self) -> DriverResult<()>;

    fn close(&mut self) -> DriverResult<()>;

    async fn close_async(&mut self) -> DriverResult<()>;

    fn create_command(&mut self, text: &str) -> DriverResult<Box<dyn Command>>;

    fn begin_transaction(
        &mut self,
        isolation: IsolationLevel,
    ) -> DriverResult<Box<dyn Transaction>>;

    /// True when this value is a diagnostics decorator
    fn is_instrumented(&self) -> bool {
        false
    }

    /// Strip one decorator layer; plain drivers return themselves
    fn into_inner(self: Box<Self>) -> Box<dyn Connection>;
}

/// An executable command bound to a connection
#[async_trait]
pub trait Command: Send + Sync {
    fn type_tag(&self) -> &str;

    fn connection_id(&self) -> ConnectionId;

    fn command_text(&self) -> String;

    fn set_command_text(&mut self, text: &str);

    fn transaction_id(&self) -> Option<TransactionId>;

    fn set_transaction(&mut self, transaction_id: Option<TransactionId>);

    /// Execute as a non-query; returns affected row count
    fn execute(&mut self) -> DriverResult<u64>;

    async fn execute_async(&mut self) -> DriverResult<u64>;

    /// Execute and return the first column of the first row, if any
    fn execute_scalar(&mut self) -> DriverResult<Option<String>>;

    async fn execute_scalar_async(&mut self) -> DriverResult<Option<String>>;

    fn is_instrumented(&self) -> bool {
        false
    }

    fn into_inner(self: Box<Self>) -> Box<dyn Command>;
}

impl std::fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("type_tag", &self.type_tag())
            .finish_non_exhaustive()
    }
}

/// An open transaction on a connection
#[async_trait]
pub trait Transaction: Send + Sync {
    fn type_tag(&self) -> &str;

    fn connection_id(&self) -> ConnectionId;

    fn transaction_id(&self) -> TransactionId;

    fn isolation(&self) -> IsolationLevel;

    fn commit(&mut self) -> DriverResult<()>;

    async fn commit_async(&mut self) -> DriverResult<()>;

    fn rollback(&mut self) -> DriverResult<()>;

    async fn rollback_async(&mut self) -> DriverResult<()>;

    fn is_instrumented(&self) -> bool {
        false
    }

    fn into_inner(self: Box<Self>) -> Box<dyn Transaction>;
}
