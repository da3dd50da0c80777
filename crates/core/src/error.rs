// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the diagnostics core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contract violations surfaced by the diagnostics APIs themselves
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("observer already disposed")]
    Disposed,
}

/// Failure raised by a wrapped driver's real operation.
///
/// Decorators rethrow the identical value to the caller after emitting
/// the error event; payloads carry a clone, so event consumers and the
/// caller observe the same failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DriverError {
    #[error("failed to open connection: {0}")]
    OpenFailed(String),
    #[error("failed to close connection: {0}")]
    CloseFailed(String),
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
    #[error("transaction commit failed: {0}")]
    CommitFailed(String),
    #[error("transaction rollback failed: {0}")]
    RollbackFailed(String),
    #[error("connection is not open")]
    NotOpen,
    #[error("transaction already completed")]
    TransactionCompleted,
    #[error("driver error: {0}")]
    Other(String),
}
