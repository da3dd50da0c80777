// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wrap and strip helpers for the diagnosed decorators
//!
//! Wrapping is idempotent: an already instrumented resource is returned
//! unchanged. Stripping removes exactly one decorator layer and is a
//! no-op on plain resources.

use std::sync::Arc;

use dbtap_core::DiagnosticSource;

use crate::diagnosed::{DiagnosedCommand, DiagnosedConnection, DiagnosedTransaction};
use crate::traits::{Command, Connection, Transaction};

pub fn instrument_connection(
    connection: Box<dyn Connection>,
    source: Arc<DiagnosticSource>,
) -> Box<dyn Connection> {
    if connection.is_instrumented() {
        return connection;
    }
    tracing::debug!(tag = connection.type_tag(), "instrumenting connection");
    Box::new(DiagnosedConnection::wrap(connection, source))
}

pub fn instrument_command(
    command: Box<dyn Command>,
    source: Arc<DiagnosticSource>,
) -> Box<dyn Command> {
    if command.is_instrumented() {
        return command;
    }
    tracing::debug!(tag = command.type_tag(), "instrumenting command");
    Box::new(DiagnosedCommand::wrap(command, source))
}

pub fn instrument_transaction(
    transaction: Box<dyn Transaction>,
    source: Arc<DiagnosticSource>,
) -> Box<dyn Transaction> {
    if transaction.is_instrumented() {
        return transaction;
    }
    tracing::debug!(tag = transaction.type_tag(), "instrumenting transaction");
    Box::new(DiagnosedTransaction::wrap(transaction, source))
}

pub fn strip_connection(connection: Box<dyn Connection>) -> Box<dyn Connection> {
    connection.into_inner()
}

pub fn strip_command(command: Box<dyn Command>) -> Box<dyn Command> {
    command.into_inner()
}

pub fn strip_transaction(transaction: Box<dyn Transaction>) -> Box<dyn Transaction> {
    transaction.into_inner()
}
