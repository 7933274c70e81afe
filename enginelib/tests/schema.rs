//! Schema registry laws: creating any supported version yields a
//! database that verifies against that version and no other, and opening
//! a created library detects the version that was created.

use enginelib::schema::{schema_ops, SchemaOps as _};
use enginelib::{Database, Error, SchemaVersion};
use rusqlite::Connection;

/// A connection shaped like a v1 handle (music + perfdata attached), on
/// which v2 schemas can also be created since they only touch `main`.
fn blank_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute("ATTACH DATABASE ':memory:' AS music", []).unwrap();
    conn.execute("ATTACH DATABASE ':memory:' AS perfdata", []).unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON").unwrap();
    conn
}

#[test]
fn every_version_verifies_against_itself() {
    for version in SchemaVersion::ALL {
        let conn = blank_connection();
        schema_ops(version).create(&conn).unwrap();
        schema_ops(version)
            .verify(&conn)
            .unwrap_or_else(|e| panic!("{version} failed to verify against itself: {e}"));
    }
}

#[test]
fn no_version_verifies_against_another() {
    for created in SchemaVersion::ALL {
        let conn = blank_connection();
        schema_ops(created).create(&conn).unwrap();

        for verified in SchemaVersion::ALL {
            if created == verified {
                continue;
            }
            let result = schema_ops(verified).verify(&conn);
            assert!(
                matches!(result, Err(Error::SchemaMismatch { .. })),
                "created {created}, verified {verified}: expected a schema mismatch, got {result:?}"
            );
        }
    }
}

#[test]
fn open_after_create_detects_the_same_version() {
    for version in SchemaVersion::ALL {
        let dir = tempfile::tempdir().unwrap();
        let created = Database::create(dir.path(), version).unwrap();
        assert_eq!(created.version(), version);
        let created_uuid = created.uuid().to_owned();
        drop(created);

        let opened = Database::open(dir.path()).unwrap();
        assert_eq!(opened.version(), version, "reopening a {version} library");
        assert_eq!(opened.uuid(), created_uuid);
        opened.verify().unwrap();
    }
}

#[test]
fn created_databases_verify_through_the_facade() {
    for version in SchemaVersion::ALL {
        let db = Database::create_temporary(version).unwrap();
        db.verify().unwrap();
        assert_eq!(db.version_name(), version.name());
    }
}

#[test]
fn create_twice_fails() {
    let dir = tempfile::tempdir().unwrap();
    Database::create(dir.path(), SchemaVersion::V1_7_1).unwrap();
    assert!(matches!(
        Database::create(dir.path(), SchemaVersion::V1_7_1),
        Err(Error::DatabaseAlreadyExists { .. })
    ));
}

#[test]
fn open_of_missing_library_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Database::open(dir.path()),
        Err(Error::DatabaseNotFound { .. })
    ));
    assert!(!Database::exists(dir.path()).unwrap());
}

#[test]
fn create_or_open_reports_creation() {
    let dir = tempfile::tempdir().unwrap();
    let (_, created) = Database::create_or_open(dir.path(), SchemaVersion::V2_0_0).unwrap();
    assert!(created);
    let (db, created) = Database::create_or_open(dir.path(), SchemaVersion::V2_0_0).unwrap();
    assert!(!created);
    assert_eq!(db.version(), SchemaVersion::V2_0_0);
    assert!(Database::exists(dir.path()).unwrap());
}

#[test]
fn unknown_version_triple_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let conn = Connection::open(dir.path().join("m.db")).unwrap();
    conn.execute_batch(
        "CREATE TABLE Information ( [id] INTEGER, [uuid] TEXT, [schemaVersionMajor] INTEGER, \
         [schemaVersionMinor] INTEGER, [schemaVersionPatch] INTEGER, \
         [currentPlayedIndiciator] INTEGER, [lastRekordBoxLibraryImportReadCounter] INTEGER, \
         PRIMARY KEY ( [id] ) );\n\
         INSERT INTO Information ([uuid], [schemaVersionMajor], [schemaVersionMinor], \
         [schemaVersionPatch], [currentPlayedIndiciator], \
         [lastRekordBoxLibraryImportReadCounter]) VALUES ('u', 9, 9, 9, 0, 0);",
    )
    .unwrap();
    drop(conn);

    match Database::open(dir.path()) {
        Err(Error::UnsupportedVersion {
            major: 9,
            minor: 9,
            patch: 9,
        }) => {}
        other => panic!("expected UnsupportedVersion 9.9.9, got {other:?}"),
    }
}

#[test]
fn ambiguous_1_18_0_without_discriminator_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let conn = Connection::open(dir.path().join("m.db")).unwrap();
    // A 1.18.0 triple whose Track table lacks the discriminating boolean
    // column type must not be guessed at.
    conn.execute_batch(
        "CREATE TABLE Information ( [id] INTEGER, [uuid] TEXT, [schemaVersionMajor] INTEGER, \
         [schemaVersionMinor] INTEGER, [schemaVersionPatch] INTEGER, \
         [currentPlayedIndiciator] INTEGER, [lastRekordBoxLibraryImportReadCounter] INTEGER, \
         PRIMARY KEY ( [id] ) );\n\
         CREATE TABLE Track ( [id] INTEGER, [isExternalTrack] TEXT, PRIMARY KEY ( [id] ) );\n\
         INSERT INTO Information ([uuid], [schemaVersionMajor], [schemaVersionMinor], \
         [schemaVersionPatch], [currentPlayedIndiciator], \
         [lastRekordBoxLibraryImportReadCounter]) VALUES ('u', 1, 18, 0, 0, 0);",
    )
    .unwrap();
    drop(conn);

    assert!(matches!(
        Database::open(dir.path()),
        Err(Error::UnsupportedVersion {
            major: 1,
            minor: 18,
            patch: 0,
        })
    ));
}

#[test]
fn information_row_carries_the_version_triple() {
    let db = Database::create_temporary(SchemaVersion::V1_9_1).unwrap();
    let info = db.information().unwrap();
    assert_eq!(
        (
            info.schema_version_major,
            info.schema_version_minor,
            info.schema_version_patch
        ),
        (1, 9, 1)
    );
    assert_eq!(info.last_import_read_counter, 0);
    assert_eq!(info.uuid, db.uuid());
}
