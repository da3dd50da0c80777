// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event channel naming and the overridable prefix registry
//!
//! Channel names follow the grammar `<prefix>.<EventKind>`. The prefix
//! is resolved from the connection's driver tag through a copy-on-write
//! table; registrations return a guard that restores the full snapshot
//! captured at registration time when dropped.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::DiagnosticsError;

/// Prefix applied when a driver tag has no registered override
pub const DEFAULT_PREFIX: &str = "db.common";

/// The closed set of lifecycle event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    ConnectionOpening,
    ConnectionOpened,
    ConnectionOpeningError,
    ConnectionClosing,
    ConnectionClosed,
    ConnectionClosingError,
    CommandExecuting,
    CommandExecuted,
    CommandExecutingError,
    TransactionCommitting,
    TransactionCommitted,
    TransactionCommittingError,
    TransactionRollingBack,
    TransactionRolledBack,
    TransactionRollingBackError,
}

impl EventKind {
    pub const ALL: [EventKind; 15] = [
        EventKind::ConnectionOpening,
        EventKind::ConnectionOpened,
        EventKind::ConnectionOpeningError,
        EventKind::ConnectionClosing,
        EventKind::ConnectionClosed,
        EventKind::ConnectionClosingError,
        EventKind::CommandExecuting,
        EventKind::CommandExecuted,
        EventKind::CommandExecutingError,
        EventKind::TransactionCommitting,
        EventKind::TransactionCommitted,
        EventKind::TransactionCommittingError,
        EventKind::TransactionRollingBack,
        EventKind::TransactionRolledBack,
        EventKind::TransactionRollingBackError,
    ];

    /// The channel-name suffix for this kind
    pub fn suffix(&self) -> &'static str {
        match self {
            EventKind::ConnectionOpening => "ConnectionOpening",
            EventKind::ConnectionOpened => "ConnectionOpened",
            EventKind::ConnectionOpeningError => "ConnectionOpeningError",
            EventKind::ConnectionClosing => "ConnectionClosing",
            EventKind::ConnectionClosed => "ConnectionClosed",
            EventKind::ConnectionClosingError => "ConnectionClosingError",
            EventKind::CommandExecuting => "CommandExecuting",
            EventKind::CommandExecuted => "CommandExecuted",
            EventKind::CommandExecutingError => "CommandExecutingError",
            EventKind::TransactionCommitting => "TransactionCommitting",
            EventKind::TransactionCommitted => "TransactionCommitted",
            EventKind::TransactionCommittingError => "TransactionCommittingError",
            EventKind::TransactionRollingBack => "TransactionRollingBack",
            EventKind::TransactionRolledBack => "TransactionRolledBack",
            EventKind::TransactionRollingBackError => "TransactionRollingBackError",
        }
    }

    /// True for the kinds that open a triad and return an operation id
    pub fn is_before(&self) -> bool {
        matches!(
            self,
            EventKind::ConnectionOpening
                | EventKind::ConnectionClosing
                | EventKind::CommandExecuting
                | EventKind::TransactionCommitting
                | EventKind::TransactionRollingBack
        )
    }

    /// True for the error leg of a triad
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            EventKind::ConnectionOpeningError
                | EventKind::ConnectionClosingError
                | EventKind::CommandExecutingError
                | EventKind::TransactionCommittingError
                | EventKind::TransactionRollingBackError
        )
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

type PrefixTable = HashMap<String, String>;

/// Copy-on-write mapping from driver tag to channel prefix.
///
/// Readers always observe a complete snapshot; writers swap in a whole
/// new table under the write lock. Clones share the same table.
pub struct PrefixRegistry {
    table: Arc<RwLock<Arc<PrefixTable>>>,
}

impl PrefixRegistry {
    /// Registry seeded with the well-known driver tags
    pub fn new() -> Self {
        let mut seeded = PrefixTable::new();
        seeded.insert("sqlite".to_string(), "db.sqlite".to_string());
        seeded.insert("postgres".to_string(), "db.postgres".to_string());
        seeded.insert("mysql".to_string(), "db.mysql".to_string());
        seeded.insert("mssql".to_string(), "db.mssql".to_string());
        Self {
            table: Arc::new(RwLock::new(Arc::new(seeded))),
        }
    }

    /// Registry with no seeded entries
    pub fn empty() -> Self {
        Self {
            table: Arc::new(RwLock::new(Arc::new(PrefixTable::new()))),
        }
    }

    /// Resolve the channel name for a driver tag and event kind
    pub fn resolve(&self, tag: &str, kind: EventKind) -> Result<String, DiagnosticsError> {
        if tag.trim().is_empty() {
            return Err(DiagnosticsError::InvalidArgument(
                "driver tag must not be blank".to_string(),
            ));
        }

        let snapshot = self.snapshot();
        let prefix = snapshot.get(tag).map(String::as_str).unwrap_or(DEFAULT_PREFIX);
        Ok(format!("{prefix}.{}", kind.suffix()))
    }

    /// Register a prefix override for a driver tag.
    ///
    /// The returned guard restores the full snapshot captured here when
    /// dropped, discarding any registrations made in between
    /// (last writer wins, never a merge).
    pub fn register(&self, tag: &str, prefix: &str) -> Result<RegistryRevert, DiagnosticsError> {
        if tag.trim().is_empty() {
            return Err(DiagnosticsError::InvalidArgument(
                "driver tag must not be blank".to_string(),
            ));
        }
        if prefix.trim().is_empty() {
            return Err(DiagnosticsError::InvalidArgument(
                "channel prefix must not be blank".to_string(),
            ));
        }

        let mut guard = self.table.write().unwrap_or_else(|e| e.into_inner());
        let previous = Arc::clone(&guard);
        let mut next = (**guard).clone();
        next.insert(tag.to_string(), prefix.to_string());
        *guard = Arc::new(next);

        tracing::info!(tag, prefix, "registered channel prefix");
        Ok(RegistryRevert {
            table: Arc::clone(&self.table),
            previous: Some(previous),
        })
    }

    /// Remove every override; same revert contract as `register`
    pub fn clear(&self) -> RegistryRevert {
        let mut guard = self.table.write().unwrap_or_else(|e| e.into_inner());
        let previous = Arc::clone(&guard);
        *guard = Arc::new(PrefixTable::new());

        tracing::info!("cleared channel prefixes");
        RegistryRevert {
            table: Arc::clone(&self.table),
            previous: Some(previous),
        }
    }

    /// Number of registered overrides
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    fn snapshot(&self) -> Arc<PrefixTable> {
        Arc::clone(&self.table.read().unwrap_or_else(|e| e.into_inner()))
    }
}

impl Default for PrefixRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PrefixRegistry {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

/// Guard that restores the registry snapshot captured at mutation time
#[must_use = "dropping the guard immediately reverts the registration"]
pub struct RegistryRevert {
    table: Arc<RwLock<Arc<PrefixTable>>>,
    previous: Option<Arc<PrefixTable>>,
}

impl RegistryRevert {
    /// Keep the mutation: consume the guard without reverting
    pub fn commit(mut self) {
        self.previous = None;
    }
}

impl Drop for RegistryRevert {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            let mut guard = self.table.write().unwrap_or_else(|e| e.into_inner());
            *guard = previous;
            tracing::debug!("restored channel prefix snapshot");
        }
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
