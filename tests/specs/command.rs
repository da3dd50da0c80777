//! Command execution instrumentation

use dbtap_core::{DriverError, EventKind, IsolationLevel, Payload};

use crate::prelude::{drain, World};

// Scenario: command executed inside a wrapped transaction carries both
// the transaction id and the connection id.
#[test]
fn command_in_transaction_reports_transaction_and_connection_ids() {
    let world = World::new();
    let mut conn = world.open_connection("sqlite");
    let tx = conn
        .begin_transaction(IsolationLevel::ReadCommitted)
        .unwrap();
    let mut rx = world.observe();

    let mut cmd = conn.create_command("insert into t values (1)").unwrap();
    cmd.set_transaction(Some(tx.transaction_id()));
    cmd.execute().unwrap();

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::CommandExecuting);
    assert_eq!(events[1].kind, EventKind::CommandExecuted);
    for event in &events {
        match &event.payload {
            Payload::Command(p) => {
                assert_eq!(p.transaction_id, Some(tx.transaction_id()));
                assert_eq!(p.connection_id, conn.connection_id());
                assert_eq!(p.command_text, "insert into t values (1)");
            }
            other => panic!("expected command payload, got {other:?}"),
        }
    }
}

#[test]
fn execute_result_passes_through_the_decorator() {
    let world = World::new();
    world.driver.set_rows_affected(5);
    world.driver.set_scalar(Some("42"));
    let mut conn = world.open_connection("sqlite");

    let mut cmd = conn.create_command("update t set x = 1").unwrap();
    assert_eq!(cmd.execute().unwrap(), 5);
    assert_eq!(cmd.execute_scalar().unwrap().as_deref(), Some("42"));
}

#[tokio::test]
async fn async_execute_failure_rethrows_and_emits_error() {
    let world = World::new();
    let mut conn = world.open_connection("sqlite");
    world.driver.fail_execute(true);
    let mut rx = world.observe();

    let mut cmd = conn.create_command("select 1").unwrap();
    let err = cmd.execute_async().await.unwrap_err();
    assert_eq!(
        err,
        DriverError::ExecutionFailed("injected execute failure".to_string())
    );

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].kind, EventKind::CommandExecutingError);
    assert_eq!(events[1].payload.error(), Some(&err));
    match &events[1].payload {
        Payload::Command(p) => assert_eq!(p.operation, "execute_async"),
        other => panic!("expected command payload, got {other:?}"),
    }
}

#[test]
fn changed_command_text_is_reflected_in_later_events() {
    let world = World::new();
    let mut conn = world.open_connection("sqlite");
    let mut rx = world.observe();

    let mut cmd = conn.create_command("select 1").unwrap();
    cmd.set_command_text("select 2");
    cmd.execute().unwrap();

    let events = drain(&mut rx);
    match &events[0].payload {
        Payload::Command(p) => assert_eq!(p.command_text, "select 2"),
        other => panic!("expected command payload, got {other:?}"),
    }
}
