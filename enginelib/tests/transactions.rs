//! Savepoint-backed transaction scopes: commit releases, drop rolls
//! back, and scopes nest.

use enginelib::{Database, SchemaVersion};

#[test]
fn dropping_a_scope_rolls_back() {
    let db = Database::create_temporary(SchemaVersion::V1_7_1).unwrap();
    {
        let scope = db.begin_transaction().unwrap();
        db.create_root_crate("Doomed").unwrap();
        assert_eq!(db.root_crates().unwrap().len(), 1);
        drop(scope);
    }
    assert!(db.root_crates().unwrap().is_empty());
}

#[test]
fn committing_a_scope_keeps_the_writes() {
    let db = Database::create_temporary(SchemaVersion::V1_7_1).unwrap();
    let scope = db.begin_transaction().unwrap();
    db.create_root_crate("Kept").unwrap();
    scope.commit().unwrap();
    assert_eq!(db.root_crates().unwrap().len(), 1);
}

#[test]
fn rolling_back_an_outer_scope_undoes_committed_inner_scopes() {
    let db = Database::create_temporary(SchemaVersion::V2_0_0).unwrap();

    let outer = db.begin_transaction().unwrap();
    db.create_root_crate("Outer").unwrap();
    {
        let inner = db.begin_transaction().unwrap();
        db.create_root_crate("Inner").unwrap();
        inner.commit().unwrap();
    }
    assert_eq!(db.crates().unwrap().len(), 2);
    drop(outer);

    assert!(db.crates().unwrap().is_empty());
}

#[test]
fn inner_rollback_preserves_outer_writes() {
    let db = Database::create_temporary(SchemaVersion::V1_13_0).unwrap();

    let outer = db.begin_transaction().unwrap();
    db.create_root_crate("Outer").unwrap();
    {
        let inner = db.begin_transaction().unwrap();
        db.create_root_crate("Inner").unwrap();
        drop(inner);
    }
    outer.commit().unwrap();

    let names: Vec<String> = db
        .root_crates()
        .unwrap()
        .iter()
        .map(|c| c.name().unwrap())
        .collect();
    assert_eq!(names, vec!["Outer"]);
}

#[test]
fn failed_multi_row_writes_leave_no_partial_state() {
    let db = Database::create_temporary(SchemaVersion::V2_0_0).unwrap();
    let a = db.create_root_crate("A").unwrap();
    a.create_sub_crate("B").unwrap();

    // The duplicate-name check fires after nothing has been written.
    assert!(a.create_sub_crate("B").is_err());
    assert_eq!(a.children().unwrap().len(), 1);
    assert_eq!(db.crates().unwrap().len(), 2);
}
