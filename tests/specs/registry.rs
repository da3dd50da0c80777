//! Prefix registry behavior: resolve, register, clear, scoped revert

use dbtap_core::{EventKind, PrefixRegistry};

#[test]
fn register_then_resolve_uses_the_registered_prefix() {
    let registry = PrefixRegistry::new();
    let revert = registry.register("cockroach", "db.cockroach").unwrap();

    assert_eq!(
        registry
            .resolve("cockroach", EventKind::CommandExecuting)
            .unwrap(),
        "db.cockroach.CommandExecuting"
    );
    revert.commit();
}

#[test]
fn clear_falls_back_to_the_default_prefix_for_registered_tags() {
    let registry = PrefixRegistry::new();
    registry.register("cockroach", "db.cockroach").unwrap().commit();

    let cleared = registry.clear();
    assert_eq!(
        registry
            .resolve("cockroach", EventKind::ConnectionOpening)
            .unwrap(),
        "db.common.ConnectionOpening"
    );
    assert_eq!(
        registry.resolve("sqlite", EventKind::ConnectionOpening).unwrap(),
        "db.common.ConnectionOpening"
    );
    drop(cleared);

    // Seeded table restored by the revert guard.
    assert_eq!(
        registry.resolve("sqlite", EventKind::ConnectionOpening).unwrap(),
        "db.sqlite.ConnectionOpening"
    );
}

#[test]
fn revert_restores_the_snapshot_taken_at_registration_time() {
    let registry = PrefixRegistry::new();

    let first = registry.register("a", "db.a").unwrap();
    registry.register("b", "db.b").unwrap().commit();

    // Dropping the earlier guard restores the table as it was before
    // "a" was registered, discarding "b" as well.
    drop(first);

    assert_eq!(
        registry.resolve("a", EventKind::ConnectionOpening).unwrap(),
        "db.common.ConnectionOpening"
    );
    assert_eq!(
        registry.resolve("b", EventKind::ConnectionOpening).unwrap(),
        "db.common.ConnectionOpening"
    );
}

#[test]
fn committed_registration_survives_guard_drop() {
    let registry = PrefixRegistry::new();
    registry.register("duckdb", "db.duckdb").unwrap().commit();

    assert_eq!(
        registry.resolve("duckdb", EventKind::ConnectionOpened).unwrap(),
        "db.duckdb.ConnectionOpened"
    );
}

#[test]
fn blank_inputs_are_rejected() {
    let registry = PrefixRegistry::new();
    assert!(registry.resolve("", EventKind::ConnectionOpening).is_err());
    assert!(registry.register(" ", "db.x").is_err());
    assert!(registry.register("x", "").is_err());
}
