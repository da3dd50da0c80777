// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier types and operation-id generation

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation key linking a "before" event to its terminal event.
///
/// The nil value is the sentinel returned when the before channel has no
/// active subscriber; it never appears on a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(Uuid);

impl OperationId {
    pub const EMPTY: OperationId = OperationId(Uuid::nil());

    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_nil()
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a connection, preserved across wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a transaction for its process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub u64);

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tx-{}", self.0)
    }
}

/// Generates operation ids
pub trait OpIdGen: Send + Sync {
    fn next(&self) -> OperationId;
}

/// UUID-based generator for production use
#[derive(Clone, Default)]
pub struct UuidOpIdGen;

impl OpIdGen for UuidOpIdGen {
    fn next(&self) -> OperationId {
        OperationId(Uuid::new_v4())
    }
}

/// Sequential generator for testing.
///
/// Doubles as a spy: `issued()` reports how many ids were handed out,
/// which proves whether the disabled-channel short circuit ran.
#[derive(Clone, Default)]
pub struct SequentialOpIdGen {
    counter: Arc<AtomicU64>,
}

impl SequentialOpIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ids generated so far
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl OpIdGen for SequentialOpIdGen {
    fn next(&self) -> OperationId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        OperationId::from_u128(u128::from(n))
    }
}
