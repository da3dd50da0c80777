//! End-to-end: decorated resources through the hub into an observer

use std::sync::Mutex;
use std::time::Duration;

use dbtap_core::{
    CommandPayload, ConnectionPayload, DbEventHandler, DbObserver, DiagnosticsError,
    TransactionPayload,
};

use crate::prelude::World;

#[derive(Default)]
struct Log {
    lines: Mutex<Vec<String>>,
}

impl Log {
    fn record(&self, line: String) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(line);
    }

    fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl DbEventHandler for Log {
    fn connection_opening(&self, payload: &ConnectionPayload) {
        self.record(format!("opening {}", payload.operation));
    }

    fn connection_opened(&self, payload: &ConnectionPayload) {
        self.record(format!("opened {}", payload.operation));
    }

    fn command_executed(&self, payload: &CommandPayload) {
        self.record(format!("executed {}", payload.command_text));
    }

    fn transaction_committed(&self, payload: &TransactionPayload) {
        self.record(format!("committed {}", payload.transaction_id));
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(30)).await;
}

#[tokio::test]
async fn observer_sees_the_full_lifecycle_of_a_decorated_connection() {
    let world = World::new();
    let observer = DbObserver::new(Log::default());
    observer.start(&world.hub).unwrap();
    settle().await;

    let mut conn = world.open_connection("sqlite");
    let mut cmd = conn.create_command("select 1").unwrap();
    cmd.execute().unwrap();
    let mut tx = conn
        .begin_transaction(dbtap_core::IsolationLevel::ReadCommitted)
        .unwrap();
    tx.commit().unwrap();
    settle().await;

    assert_eq!(
        observer.handler().lines(),
        vec![
            "opening open".to_string(),
            "opened open".to_string(),
            "executed select 1".to_string(),
            "committed tx-1".to_string(),
        ]
    );
}

#[tokio::test]
async fn stopping_the_observer_disables_emission_entirely() {
    let world = World::new();
    let observer = DbObserver::new(Log::default());
    observer.start(&world.hub).unwrap();
    settle().await;

    observer.stop().unwrap();

    let mut conn = world.connection("sqlite");
    conn.open().unwrap();
    settle().await;

    assert!(observer.handler().lines().is_empty());
    assert_eq!(world.ids.issued(), 0);
}

#[tokio::test]
async fn disposed_observer_cannot_be_reused() {
    let world = World::new();
    let observer = DbObserver::new(Log::default());
    observer.start(&world.hub).unwrap();
    observer.dispose();

    assert!(matches!(
        observer.start(&world.hub),
        Err(DiagnosticsError::Disposed)
    ));
}
