//! Transaction commit/rollback instrumentation

use dbtap_core::{DriverError, EventKind, IsolationLevel, Payload};

use crate::prelude::{drain, World};

// Scenario: commit under ReadCommitted reports the isolation level on
// both events and shares one operation id.
#[test]
fn commit_reports_isolation_level_on_both_events() {
    let world = World::new();
    let mut conn = world.open_connection("sqlite");
    let mut rx = world.observe();

    let mut tx = conn
        .begin_transaction(IsolationLevel::ReadCommitted)
        .unwrap();
    tx.commit().unwrap();

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::TransactionCommitting);
    assert_eq!(events[1].kind, EventKind::TransactionCommitted);
    assert_eq!(
        events[0].payload.operation_id(),
        events[1].payload.operation_id()
    );
    for event in &events {
        match &event.payload {
            Payload::Transaction(p) => {
                assert_eq!(p.isolation, IsolationLevel::ReadCommitted);
                assert_eq!(p.transaction_id, tx.transaction_id());
            }
            other => panic!("expected transaction payload, got {other:?}"),
        }
    }
}

#[test]
fn rollback_emits_its_own_triad() {
    let world = World::new();
    let mut conn = world.open_connection("sqlite");
    let mut rx = world.observe();

    let mut tx = conn
        .begin_transaction(IsolationLevel::Serializable)
        .unwrap();
    tx.rollback().unwrap();

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::TransactionRollingBack);
    assert_eq!(events[1].kind, EventKind::TransactionRolledBack);
}

#[tokio::test]
async fn commit_failure_rethrows_and_emits_error() {
    let world = World::new();
    let mut conn = world.open_connection("mysql");
    world.driver.fail_commit(true);
    let mut rx = world.observe();

    let mut tx = conn
        .begin_transaction(IsolationLevel::ReadCommitted)
        .unwrap();
    let err = tx.commit_async().await.unwrap_err();
    assert_eq!(
        err,
        DriverError::CommitFailed("injected commit failure".to_string())
    );

    let events = drain(&mut rx);
    assert_eq!(events[0].channel, "db.mysql.TransactionCommitting");
    assert_eq!(events[1].kind, EventKind::TransactionCommittingError);
    assert_eq!(events[1].payload.error(), Some(&err));
}

#[test]
fn completed_transaction_errors_pass_through() {
    let world = World::new();
    let mut conn = world.open_connection("sqlite");

    let mut tx = conn
        .begin_transaction(IsolationLevel::ReadCommitted)
        .unwrap();
    tx.commit().unwrap();

    assert_eq!(tx.commit().unwrap_err(), DriverError::TransactionCompleted);
    assert_eq!(
        tx.rollback().unwrap_err(),
        DriverError::TransactionCompleted
    );
}
