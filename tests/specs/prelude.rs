//! Shared harness for the behavioral test suite

use std::sync::Arc;

use dbtap_adapters::{instrument_connection, Connection, FakeDriver};
use dbtap_core::{
    DbEvent, DiagnosticSource, EventHub, EventReceiver, Listener, MonotonicClock, OpIdGen,
    PrefixRegistry, SequentialOpIdGen, Subscription, DB_LISTENER,
};

/// One hub, one fake driver, one diagnostic source
pub struct World {
    pub hub: EventHub,
    pub driver: FakeDriver,
    pub source: Arc<DiagnosticSource>,
    pub ids: SequentialOpIdGen,
}

impl World {
    pub fn new() -> Self {
        let hub = EventHub::new();
        let ids = SequentialOpIdGen::new();
        let source = Arc::new(DiagnosticSource::with_parts(
            hub.listener(DB_LISTENER),
            PrefixRegistry::new(),
            Arc::new(ids.clone()) as Arc<dyn OpIdGen>,
            MonotonicClock::new(),
        ));
        Self {
            hub,
            driver: FakeDriver::new(),
            source,
            ids,
        }
    }

    /// Catch-all subscription on the diagnostic listener
    pub fn observe(&self) -> EventReceiver {
        self.listener()
            .subscribe(Subscription::all("spec-probe", "spec suite probe"))
    }

    pub fn listener(&self) -> Listener {
        self.hub.listener(DB_LISTENER)
    }

    /// Instrumented connection over a fresh fake, still closed
    pub fn connection(&self, tag: &str) -> Box<dyn Connection> {
        instrument_connection(Box::new(self.driver.connect(tag)), Arc::clone(&self.source))
    }

    /// Instrumented connection, already opened
    pub fn open_connection(&self, tag: &str) -> Box<dyn Connection> {
        let mut conn = self.connection(tag);
        conn.open().unwrap();
        conn
    }
}

/// Collect everything currently buffered in the receiver
pub fn drain(rx: &mut EventReceiver) -> Vec<DbEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
