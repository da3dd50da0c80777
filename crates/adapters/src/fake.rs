// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake driver for tests
//!
//! `FakeDriver` is the shared backend: it records every call made
//! through its connections, commands, and transactions, and carries the
//! injected failure switches. Resources hold a clone of the driver, so
//! a test keeps its own handle to inspect calls afterwards.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use dbtap_core::{ConnectionId, DriverError, IsolationLevel, TransactionId};

use crate::traits::{Command, Connection, ConnectionState, DriverResult, Transaction};

/// One recorded driver invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Open,
    OpenAsync,
    Close,
    CloseAsync,
    CreateCommand(String),
    BeginTransaction(IsolationLevel),
    Execute(String),
    ExecuteAsync(String),
    ExecuteScalar(String),
    ExecuteScalarAsync(String),
    Commit(TransactionId),
    CommitAsync(TransactionId),
    Rollback(TransactionId),
    RollbackAsync(TransactionId),
}

#[derive(Default)]
struct DriverState {
    calls: Vec<DriverCall>,
    fail_open: bool,
    fail_close: bool,
    fail_execute: bool,
    fail_commit: bool,
    fail_rollback: bool,
    rows_affected: u64,
    scalar: Option<String>,
    next_tx: u64,
}

/// Shared fake backend; clones share state
#[derive(Clone, Default)]
pub struct FakeDriver {
    state: Arc<Mutex<DriverState>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// New closed connection for the given driver tag
    pub fn connect(&self, tag: &str) -> FakeConnection {
        FakeConnection {
            driver: self.clone(),
            tag: tag.to_string(),
            id: ConnectionId::new(),
            client_version: Some("fake-1.0".to_string()),
            state: ConnectionState::Closed,
        }
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.lock().calls.clone()
    }

    pub fn fail_open(&self, fail: bool) {
        self.lock().fail_open = fail;
    }

    pub fn fail_close(&self, fail: bool) {
        self.lock().fail_close = fail;
    }

    pub fn fail_execute(&self, fail: bool) {
        self.lock().fail_execute = fail;
    }

    pub fn fail_commit(&self, fail: bool) {
        self.lock().fail_commit = fail;
    }

    pub fn fail_rollback(&self, fail: bool) {
        self.lock().fail_rollback = fail;
    }

    pub fn set_rows_affected(&self, rows: u64) {
        self.lock().rows_affected = rows;
    }

    pub fn set_scalar(&self, value: Option<&str>) {
        self.lock().scalar = value.map(str::to_string);
    }

    fn record(&self, call: DriverCall) {
        self.lock().calls.push(call);
    }

    fn next_tx(&self) -> TransactionId {
        let mut state = self.lock();
        state.next_tx += 1;
        TransactionId(state.next_tx)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DriverState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub struct FakeConnection {
    driver: FakeDriver,
    tag: String,
    id: ConnectionId,
    client_version: Option<String>,
    state: ConnectionState,
}

impl FakeConnection {
    fn do_open(&mut self, call: DriverCall) -> DriverResult<()> {
        self.driver.record(call);
        if self.driver.lock().fail_open {
            return Err(DriverError::OpenFailed("injected open failure".to_string()));
        }
        self.state = ConnectionState::Open;
        Ok(())
    }

    fn do_close(&mut self, call: DriverCall) -> DriverResult<()> {
        self.driver.record(call);
        if self.driver.lock().fail_close {
            return Err(DriverError::CloseFailed(
                "injected close failure".to_string(),
            ));
        }
        self.state = ConnectionState::Closed;
        Ok(())
    }
}

#[async_trait]
impl Connection for FakeConnection {
    fn type_tag(&self) -> &str {
        &self.tag
    }

    fn connection_id(&self) -> ConnectionId {
        self.id
    }

    fn client_version(&self) -> Option<String> {
        self.client_version.clone()
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn open(&mut self) -> DriverResult<()> {
        self.do_open(DriverCall::Open)
    }

    async fn open_async(&mut self) -> DriverResult<()> {
        self.do_open(DriverCall::OpenAsync)
    }

    fn close(&mut self) -> DriverResult<()> {
        self.do_close(DriverCall::Close)
    }

    async fn close_async(&mut self) -> DriverResult<()> {
        self.do_close(DriverCall::CloseAsync)
    }

    fn create_command(&mut self, text: &str) -> DriverResult<Box<dyn Command>> {
        if self.state != ConnectionState::Open {
            return Err(DriverError::NotOpen);
        }
        self.driver.record(DriverCall::CreateCommand(text.to_string()));
        Ok(Box::new(FakeCommand {
            driver: self.driver.clone(),
            tag: self.tag.clone(),
            connection_id: self.id,
            text: text.to_string(),
            transaction_id: None,
        }))
    }

    fn begin_transaction(
        &mut self,
        isolation: IsolationLevel,
    ) -> DriverResult<Box<dyn Transaction>> {
        if self.state != ConnectionState::Open {
            return Err(DriverError::NotOpen);
        }
        self.driver.record(DriverCall::BeginTransaction(isolation));
        let transaction_id = self.driver.next_tx();
        Ok(Box::new(FakeTransaction {
            driver: self.driver.clone(),
            tag: self.tag.clone(),
            connection_id: self.id,
            transaction_id,
            isolation,
            completed: false,
        }))
    }

    fn into_inner(self: Box<Self>) -> Box<dyn Connection> {
        self
    }
}

pub struct FakeCommand {
    driver: FakeDriver,
    tag: String,
    connection_id: ConnectionId,
    text: String,
    transaction_id: Option<TransactionId>,
}

impl FakeCommand {
    fn do_execute(&mut self, call: DriverCall) -> DriverResult<u64> {
        self.driver.record(call);
        let state = self.driver.lock();
        if state.fail_execute {
            return Err(DriverError::ExecutionFailed(
                "injected execute failure".to_string(),
            ));
        }
        Ok(state.rows_affected)
    }

    fn do_scalar(&mut self, call: DriverCall) -> DriverResult<Option<String>> {
        self.driver.record(call);
        let state = self.driver.lock();
        if state.fail_execute {
            return Err(DriverError::ExecutionFailed(
                "injected execute failure".to_string(),
            ));
        }
        Ok(state.scalar.clone())
    }
}

#[async_trait]
impl Command for FakeCommand {
    fn type_tag(&self) -> &str {
        &self.tag
    }

    fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    fn command_text(&self) -> String {
        self.text.clone()
    }

    fn set_command_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    fn set_transaction(&mut self, transaction_id: Option<TransactionId>) {
        self.transaction_id = transaction_id;
    }

    fn execute(&mut self) -> DriverResult<u64> {
        self.do_execute(DriverCall::Execute(self.text.clone()))
    }

    async fn execute_async(&mut self) -> DriverResult<u64> {
        self.do_execute(DriverCall::ExecuteAsync(self.text.clone()))
    }

    fn execute_scalar(&mut self) -> DriverResult<Option<String>> {
        self.do_scalar(DriverCall::ExecuteScalar(self.text.clone()))
    }

    async fn execute_scalar_async(&mut self) -> DriverResult<Option<String>> {
        self.do_scalar(DriverCall::ExecuteScalarAsync(self.text.clone()))
    }

    fn into_inner(self: Box<Self>) -> Box<dyn Command> {
        self
    }
}

pub struct FakeTransaction {
    driver: FakeDriver,
    tag: String,
    connection_id: ConnectionId,
    transaction_id: TransactionId,
    isolation: IsolationLevel,
    completed: bool,
}

impl FakeTransaction {
    fn do_commit(&mut self, call: DriverCall) -> DriverResult<()> {
        if self.completed {
            return Err(DriverError::TransactionCompleted);
        }
        self.driver.record(call);
        if self.driver.lock().fail_commit {
            return Err(DriverError::CommitFailed(
                "injected commit failure".to_string(),
            ));
        }
        self.completed = true;
        Ok(())
    }

    fn do_rollback(&mut self, call: DriverCall) -> DriverResult<()> {
        if self.completed {
            return Err(DriverError::TransactionCompleted);
        }
        self.driver.record(call);
        if self.driver.lock().fail_rollback {
            return Err(DriverError::RollbackFailed(
                "injected rollback failure".to_string(),
            ));
        }
        self.completed = true;
        Ok(())
    }
}

#[async_trait]
impl Transaction for FakeTransaction {
    fn type_tag(&self) -> &str {
        &self.tag
    }

    fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    fn isolation(&self) -> IsolationLevel {
        self.isolation
    }

    fn commit(&mut self) -> DriverResult<()> {
        self.do_commit(DriverCall::Commit(self.transaction_id))
    }

    async fn commit_async(&mut self) -> DriverResult<()> {
        self.do_commit(DriverCall::CommitAsync(self.transaction_id))
    }

    fn rollback(&mut self) -> DriverResult<()> {
        self.do_rollback(DriverCall::Rollback(self.transaction_id))
    }

    async fn rollback_async(&mut self) -> DriverResult<()> {
        self.do_rollback(DriverCall::RollbackAsync(self.transaction_id))
    }

    fn into_inner(self: Box<Self>) -> Box<dyn Transaction> {
        self
    }
}
