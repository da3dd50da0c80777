// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Driver resource traits and the diagnosed decorators

pub mod diagnosed;
pub mod instrument;
pub mod traits;

pub use diagnosed::{DiagnosedCommand, DiagnosedConnection, DiagnosedTransaction};
pub use instrument::{
    instrument_command, instrument_connection, instrument_transaction, strip_command,
    strip_connection, strip_transaction,
};
pub use traits::{Command, Connection, ConnectionState, DriverResult, Transaction};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DriverCall, FakeCommand, FakeConnection, FakeDriver, FakeTransaction};
