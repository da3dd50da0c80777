//! Connection open/close instrumentation

use dbtap_core::{DriverError, EventKind, Payload};

use crate::prelude::{drain, World};

// Scenario: successful open emits exactly opening + opened.
#[test]
fn successful_open_emits_opening_then_opened_with_one_id() {
    let world = World::new();
    let mut rx = world.observe();

    let _conn = world.open_connection("sqlite");

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::ConnectionOpening);
    assert_eq!(events[1].kind, EventKind::ConnectionOpened);
    assert_eq!(
        events[0].payload.operation_id(),
        events[1].payload.operation_id()
    );
    assert!(events[1].payload.timestamp() > events[0].payload.timestamp());
}

// Scenario: failed open emits opening + opening-error and rethrows.
#[test]
fn failed_open_emits_error_event_and_rethrows_unchanged() {
    let world = World::new();
    world.driver.fail_open(true);
    let mut rx = world.observe();

    let mut conn = world.connection("sqlite");
    let err = conn.open().unwrap_err();
    assert_eq!(
        err,
        DriverError::OpenFailed("injected open failure".to_string())
    );

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::ConnectionOpening);
    assert_eq!(events[1].kind, EventKind::ConnectionOpeningError);
    assert_eq!(events[1].payload.error(), Some(&err));
    assert_eq!(
        events[0].payload.operation_id(),
        events[1].payload.operation_id()
    );
}

#[test]
fn disabled_channel_produces_no_ids_and_no_payloads() {
    let world = World::new();
    // No subscriber at all.

    let mut conn = world.connection("sqlite");
    conn.open().unwrap();
    conn.close().unwrap();

    assert_eq!(world.ids.issued(), 0);
}

#[test]
fn close_emits_its_own_triad() {
    let world = World::new();
    let mut conn = world.open_connection("sqlite");
    let mut rx = world.observe();

    conn.close().unwrap();

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::ConnectionClosing);
    assert_eq!(events[1].kind, EventKind::ConnectionClosed);
    match &events[0].payload {
        Payload::Connection(p) => {
            assert_eq!(p.operation, "close");
            assert_eq!(p.connection_id, conn.connection_id());
        }
        other => panic!("expected connection payload, got {other:?}"),
    }
}

#[tokio::test]
async fn async_open_and_close_emit_triads_with_async_labels() {
    let world = World::new();
    let mut rx = world.observe();

    let mut conn = world.connection("postgres");
    conn.open_async().await.unwrap();
    conn.close_async().await.unwrap();

    let events = drain(&mut rx);
    assert_eq!(events.len(), 4);
    assert_eq!(events[0].channel, "db.postgres.ConnectionOpening");
    match &events[0].payload {
        Payload::Connection(p) => assert_eq!(p.operation, "open_async"),
        other => panic!("expected connection payload, got {other:?}"),
    }
    match &events[3].payload {
        Payload::Connection(p) => assert_eq!(p.operation, "close_async"),
        other => panic!("expected connection payload, got {other:?}"),
    }
}

#[test]
fn registered_prefix_routes_connection_events() {
    let world = World::new();
    let mut rx = world.observe();

    let revert = world.source.prefixes().register("oracle", "db.oracle").unwrap();
    let _conn = world.open_connection("oracle");
    revert.commit();

    let events = drain(&mut rx);
    assert_eq!(events[0].channel, "db.oracle.ConnectionOpening");
    assert_eq!(events[1].channel, "db.oracle.ConnectionOpened");
}
