//! Behavioral specifications for dbtap.
//!
//! These tests are black-box: they drive fake driver resources through
//! the instrumentation API and verify the emitted event stream.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/registry.rs"]
mod registry;

#[path = "specs/wrapping.rs"]
mod wrapping;

#[path = "specs/connection.rs"]
mod connection;

#[path = "specs/command.rs"]
mod command;

#[path = "specs/transaction.rs"]
mod transaction;

#[path = "specs/observer.rs"]
mod observer;
