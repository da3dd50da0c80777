// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monotonic event clock
//!
//! Event timestamps are ordering ticks, not wall-clock time. Consumers
//! pair events by operation id and compare timestamps only for ordering
//! within a single source.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A monotonic tick taken when an event was built
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strictly increasing tick source shared by all emitters of one source
#[derive(Clone, Default)]
pub struct MonotonicClock {
    ticks: Arc<AtomicU64>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next tick. Never returns the same value twice.
    pub fn tick(&self) -> Timestamp {
        Timestamp(self.ticks.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
