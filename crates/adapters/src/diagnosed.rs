// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnosed decorators for connections, commands, and transactions
//!
//! Each decorator forwards every member to its inner resource and
//! brackets the lifecycle operations with the before/after/error triad.
//! Identity fields are captured before the inner call so terminal
//! events describe the resource as it was when the operation began.
//! Driver failures are rethrown unchanged after the error event.

use std::sync::Arc;

use async_trait::async_trait;

use dbtap_core::{
    ConnectionId, DiagnosticSource, IsolationLevel, OperationId, TransactionId,
};

use crate::traits::{Command, Connection, ConnectionState, DriverResult, Transaction};

/// Connection decorator emitting open/close triads
pub struct DiagnosedConnection {
    inner: Box<dyn Connection>,
    source: Arc<DiagnosticSource>,
}

/// Identity snapshot taken before an instrumented connection call
struct ConnScope {
    tag: String,
    connection_id: ConnectionId,
    client_version: Option<String>,
}

impl DiagnosedConnection {
    pub fn wrap(inner: Box<dyn Connection>, source: Arc<DiagnosticSource>) -> Self {
        Self { inner, source }
    }

    fn scope(&self) -> ConnScope {
        ConnScope {
            tag: self.inner.type_tag().to_string(),
            connection_id: self.inner.connection_id(),
            client_version: self.inner.client_version(),
        }
    }

    fn open_before(&self, scope: &ConnScope, operation: &str) -> OperationId {
        self.source.connection_open_before(
            &scope.tag,
            scope.connection_id,
            scope.client_version.as_deref(),
            operation,
        )
    }

    fn settle_open(
        &self,
        id: OperationId,
        scope: &ConnScope,
        operation: &str,
        result: DriverResult<()>,
    ) -> DriverResult<()> {
        match result {
            Ok(()) => {
                self.source.connection_open_after(
                    id,
                    &scope.tag,
                    scope.connection_id,
                    scope.client_version.as_deref(),
                    operation,
                );
                Ok(())
            }
            Err(err) => {
                self.source.connection_open_error(
                    id,
                    &scope.tag,
                    scope.connection_id,
                    scope.client_version.as_deref(),
                    operation,
                    &err,
                );
                Err(err)
            }
        }
    }

    fn settle_close(
        &self,
        id: OperationId,
        scope: &ConnScope,
        operation: &str,
        result: DriverResult<()>,
    ) -> DriverResult<()> {
        match result {
            Ok(()) => {
                self.source
                    .connection_close_after(id, &scope.tag, scope.connection_id, operation);
                Ok(())
            }
            Err(err) => {
                self.source.connection_close_error(
                    id,
                    &scope.tag,
                    scope.connection_id,
                    operation,
                    &err,
                );
                Err(err)
            }
        }
    }
}

#[async_trait]
impl Connection for DiagnosedConnection {
    fn type_tag(&self) -> &str {
        self.inner.type_tag()
    }

    fn connection_id(&self) -> ConnectionId {
        self.inner.connection_id()
    }

    fn client_version(&self) -> Option<String> {
        self.inner.client_version()
    }

    fn state(&self) -> ConnectionState {
        self.inner.state()
    }

    fn open(&mut self) -> DriverResult<()> {
        let scope = self.scope();
        let id = self.open_before(&scope, "open");
        let result = self.inner.open();
        self.settle_open(id, &scope, "open", result)
    }

    async fn open_async(&mut self) -> DriverResult<()> {
        let scope = self.scope();
        let id = self.open_before(&scope, "open_async");
        let result = self.inner.open_async().await;
        self.settle_open(id, &scope, "open_async", result)
    }

    fn close(&mut self) -> DriverResult<()> {
        let scope = self.scope();
        let id = self
            .source
            .connection_close_before(&scope.tag, scope.connection_id, "close");
        let result = self.inner.close();
        self.settle_close(id, &scope, "close", result)
    }

    async fn close_async(&mut self) -> DriverResult<()> {
        let scope = self.scope();
        let id =
            self.source
                .connection_close_before(&scope.tag, scope.connection_id, "close_async");
        let result = self.inner.close_async().await;
        self.settle_close(id, &scope, "close_async", result)
    }

    fn create_command(&mut self, text: &str) -> DriverResult<Box<dyn Command>> {
        let command = self.inner.create_command(text)?;
        if command.is_instrumented() {
            return Ok(command);
        }
        Ok(Box::new(DiagnosedCommand::wrap(
            command,
            Arc::clone(&self.source),
        )))
    }

    fn begin_transaction(
        &mut self,
        isolation: IsolationLevel,
    ) -> DriverResult<Box<dyn Transaction>> {
        let transaction = self.inner.begin_transaction(isolation)?;
        if transaction.is_instrumented() {
            return Ok(transaction);
        }
        Ok(Box::new(DiagnosedTransaction::wrap(
            transaction,
            Arc::clone(&self.source),
        )))
    }

    fn is_instrumented(&self) -> bool {
        true
    }

    fn into_inner(self: Box<Self>) -> Box<dyn Connection> {
        self.inner
    }
}

/// Command decorator emitting execute triads
pub struct DiagnosedCommand {
    inner: Box<dyn Command>,
    source: Arc<DiagnosticSource>,
}

/// Identity snapshot taken before an instrumented command call
struct CommandScope {
    tag: String,
    connection_id: ConnectionId,
    command_text: String,
    transaction_id: Option<TransactionId>,
}

impl DiagnosedCommand {
    pub fn wrap(inner: Box<dyn Command>, source: Arc<DiagnosticSource>) -> Self {
        Self { inner, source }
    }

    fn scope(&self) -> CommandScope {
        CommandScope {
            tag: self.inner.type_tag().to_string(),
            connection_id: self.inner.connection_id(),
            command_text: self.inner.command_text(),
            transaction_id: self.inner.transaction_id(),
        }
    }

    fn before(&self, scope: &CommandScope, operation: &str) -> OperationId {
        self.source.command_before(
            &scope.tag,
            scope.connection_id,
            &scope.command_text,
            scope.transaction_id,
            operation,
        )
    }

    fn settle<T>(
        &self,
        id: OperationId,
        scope: &CommandScope,
        operation: &str,
        result: DriverResult<T>,
    ) -> DriverResult<T> {
        match result {
            Ok(value) => {
                self.source.command_after(
                    id,
                    &scope.tag,
                    scope.connection_id,
                    &scope.command_text,
                    scope.transaction_id,
                    operation,
                );
                Ok(value)
            }
            Err(err) => {
                self.source.command_error(
                    id,
                    &scope.tag,
                    scope.connection_id,
                    &scope.command_text,
                    scope.transaction_id,
                    operation,
                    &err,
                );
                Err(err)
            }
        }
    }
}

#[async_trait]
impl Command for DiagnosedCommand {
    fn type_tag(&self) -> &str {
        self.inner.type_tag()
    }

    fn connection_id(&self) -> ConnectionId {
        self.inner.connection_id()
    }

    fn command_text(&self) -> String {
        self.inner.command_text()
    }

    fn set_command_text(&mut self, text: &str) {
        self.inner.set_command_text(text);
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        self.inner.transaction_id()
    }

    fn set_transaction(&mut self, transaction_id: Option<TransactionId>) {
        self.inner.set_transaction(transaction_id);
    }

    fn execute(&mut self) -> DriverResult<u64> {
        let scope = self.scope();
        let id = self.before(&scope, "execute");
        let result = self.inner.execute();
        self.settle(id, &scope, "execute", result)
    }

    async fn execute_async(&mut self) -> DriverResult<u64> {
        let scope = self.scope();
        let id = self.before(&scope, "execute_async");
        let result = self.inner.execute_async().await;
        self.settle(id, &scope, "execute_async", result)
    }

    fn execute_scalar(&mut self) -> DriverResult<Option<String>> {
        let scope = self.scope();
        let id = self.before(&scope, "execute_scalar");
        let result = self.inner.execute_scalar();
        self.settle(id, &scope, "execute_scalar", result)
    }

    async fn execute_scalar_async(&mut self) -> DriverResult<Option<String>> {
        let scope = self.scope();
        let id = self.before(&scope, "execute_scalar_async");
        let result = self.inner.execute_scalar_async().await;
        self.settle(id, &scope, "execute_scalar_async", result)
    }

    fn is_instrumented(&self) -> bool {
        true
    }

    fn into_inner(self: Box<Self>) -> Box<dyn Command> {
        self.inner
    }
}

/// Transaction decorator emitting commit/rollback triads
pub struct DiagnosedTransaction {
    inner: Box<dyn Transaction>,
    source: Arc<DiagnosticSource>,
}

/// Identity snapshot taken before an instrumented transaction call
struct TxScope {
    tag: String,
    isolation: IsolationLevel,
    connection_id: ConnectionId,
    transaction_id: TransactionId,
}

impl DiagnosedTransaction {
    pub fn wrap(inner: Box<dyn Transaction>, source: Arc<DiagnosticSource>) -> Self {
        Self { inner, source }
    }

    fn scope(&self) -> TxScope {
        TxScope {
            tag: self.inner.type_tag().to_string(),
            isolation: self.inner.isolation(),
            connection_id: self.inner.connection_id(),
            transaction_id: self.inner.transaction_id(),
        }
    }

    fn commit_before(&self, scope: &TxScope, operation: &str) -> OperationId {
        self.source.transaction_commit_before(
            &scope.tag,
            scope.isolation,
            scope.connection_id,
            scope.transaction_id,
            operation,
        )
    }

    fn rollback_before(&self, scope: &TxScope, operation: &str) -> OperationId {
        self.source.transaction_rollback_before(
            &scope.tag,
            scope.isolation,
            scope.connection_id,
            scope.transaction_id,
            operation,
        )
    }

    fn settle_commit(
        &self,
        id: OperationId,
        scope: &TxScope,
        operation: &str,
        result: DriverResult<()>,
    ) -> DriverResult<()> {
        match result {
            Ok(()) => {
                self.source.transaction_commit_after(
                    id,
                    &scope.tag,
                    scope.isolation,
                    scope.connection_id,
                    scope.transaction_id,
                    operation,
                );
                Ok(())
            }
            Err(err) => {
                self.source.transaction_commit_error(
                    id,
                    &scope.tag,
                    scope.isolation,
                    scope.connection_id,
                    scope.transaction_id,
                    operation,
                    &err,
                );
                Err(err)
            }
        }
    }

    fn settle_rollback(
        &self,
        id: OperationId,
        scope: &TxScope,
        operation: &str,
        result: DriverResult<()>,
    ) -> DriverResult<()> {
        match result {
            Ok(()) => {
                self.source.transaction_rollback_after(
                    id,
                    &scope.tag,
                    scope.isolation,
                    scope.connection_id,
                    scope.transaction_id,
                    operation,
                );
                Ok(())
            }
            Err(err) => {
                self.source.transaction_rollback_error(
                    id,
                    &scope.tag,
                    scope.isolation,
                    scope.connection_id,
                    scope.transaction_id,
                    operation,
                    &err,
                );
                Err(err)
            }
        }
    }
}

#[async_trait]
impl Transaction for DiagnosedTransaction {
    fn type_tag(&self) -> &str {
        self.inner.type_tag()
    }

    fn connection_id(&self) -> ConnectionId {
        self.inner.connection_id()
    }

    fn transaction_id(&self) -> TransactionId {
        self.inner.transaction_id()
    }

    fn isolation(&self) -> IsolationLevel {
        self.inner.isolation()
    }

    fn commit(&mut self) -> DriverResult<()> {
        let scope = self.scope();
        let id = self.commit_before(&scope, "commit");
        let result = self.inner.commit();
        self.settle_commit(id, &scope, "commit", result)
    }

    async fn commit_async(&mut self) -> DriverResult<()> {
        let scope = self.scope();
        let id = self.commit_before(&scope, "commit_async");
        let result = self.inner.commit_async().await;
        self.settle_commit(id, &scope, "commit_async", result)
    }

    fn rollback(&mut self) -> DriverResult<()> {
        let scope = self.scope();
        let id = self.rollback_before(&scope, "rollback");
        let result = self.inner.rollback();
        self.settle_rollback(id, &scope, "rollback", result)
    }

    async fn rollback_async(&mut self) -> DriverResult<()> {
        let scope = self.scope();
        let id = self.rollback_before(&scope, "rollback_async");
        let result = self.inner.rollback_async().await;
        self.settle_rollback(id, &scope, "rollback_async", result)
    }

    fn is_instrumented(&self) -> bool {
        true
    }

    fn into_inner(self: Box<Self>) -> Box<dyn Transaction> {
        self.inner
    }
}

#[cfg(test)]
#[path = "diagnosed_tests.rs"]
mod tests;
