// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dbtap-core: Core library for dbtap database diagnostics
//!
//! This crate provides:
//! - Event channel naming with an overridable per-driver prefix registry
//! - Operation correlation ids and a monotonic event clock
//! - Payload types for connection, command, and transaction events
//! - The event hub / listener pub-sub transport
//! - The diagnostic source (before/after/error emission triads)
//! - The observer that dispatches events to typed handlers

pub mod channel;
pub mod clock;
pub mod error;
pub mod id;
pub mod payload;

pub mod events;
pub mod observer;
pub mod source;

// Re-exports
pub use channel::{EventKind, PrefixRegistry, RegistryRevert, DEFAULT_PREFIX};
pub use clock::{MonotonicClock, Timestamp};
pub use error::{DiagnosticsError, DriverError};
pub use id::{ConnectionId, OpIdGen, OperationId, SequentialOpIdGen, TransactionId, UuidOpIdGen};
pub use payload::{CommandPayload, ConnectionPayload, IsolationLevel, Payload, TransactionPayload};

pub use events::{ChannelPattern, DbEvent, EventHub, EventReceiver, Listener, SubscriberId, Subscription};
pub use observer::{DbEventHandler, DbObserver, ObserverState};
pub use source::{DiagnosticSource, DB_LISTENER};
