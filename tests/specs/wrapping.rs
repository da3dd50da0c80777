//! Wrap and strip guarantees

use std::sync::Arc;

use dbtap_adapters::{instrument_connection, strip_connection, Connection, ConnectionState};

use crate::prelude::World;

#[test]
fn strip_of_wrap_returns_the_original_resource() {
    let world = World::new();
    let inner = world.driver.connect("sqlite");
    let id = inner.connection_id();

    let wrapped = instrument_connection(Box::new(inner), Arc::clone(&world.source));
    let stripped = strip_connection(wrapped);

    assert!(!stripped.is_instrumented());
    assert_eq!(stripped.connection_id(), id);
}

#[test]
fn wrapping_twice_never_stacks_decorators() {
    let world = World::new();
    let once = world.connection("sqlite");
    let twice = instrument_connection(once, Arc::clone(&world.source));

    // One strip fully removes instrumentation.
    assert!(!strip_connection(twice).is_instrumented());
}

#[test]
fn decorated_and_plain_resources_report_the_same_surface() {
    let world = World::new();
    let plain = world.driver.connect("postgres");
    let id = plain.connection_id();
    let version = plain.client_version();

    let wrapped = instrument_connection(Box::new(plain), Arc::clone(&world.source));

    assert_eq!(wrapped.type_tag(), "postgres");
    assert_eq!(wrapped.connection_id(), id);
    assert_eq!(wrapped.client_version(), version);
    assert_eq!(wrapped.state(), ConnectionState::Closed);
}

#[test]
fn strip_is_a_no_op_on_plain_resources() {
    let world = World::new();
    let plain: Box<dyn Connection> = Box::new(world.driver.connect("sqlite"));
    let id = plain.connection_id();

    let stripped = strip_connection(plain);
    assert!(!stripped.is_instrumented());
    assert_eq!(stripped.connection_id(), id);
}
