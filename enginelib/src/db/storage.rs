use std::cell::Cell;
use std::path::PathBuf;

use rusqlite::Connection;

use crate::version::SchemaVersion;

/// One open library: the SQLite connection (with the v1 music and
/// performance files attached where applicable), the detected or created
/// schema version, and the per-handle savepoint counter.
///
/// A storage handle is deliberately not `Send` or `Sync`; callers who
/// need concurrency open independent handles against the same directory
/// and rely on SQLite's own locking.
pub(crate) struct Storage {
    pub(crate) conn: Connection,
    pub(crate) version: SchemaVersion,
    pub(crate) directory: PathBuf,
    /// UUID of the music database's `Information` row, cached at open.
    pub(crate) uuid: String,
    last_savepoint: Cell<i64>,
}

impl Storage {
    pub(crate) fn new(
        conn: Connection,
        version: SchemaVersion,
        directory: PathBuf,
        uuid: String,
    ) -> Self {
        Storage {
            conn,
            version,
            directory,
            uuid,
            last_savepoint: Cell::new(0),
        }
    }

    pub(crate) fn next_savepoint(&self) -> i64 {
        let n = self.last_savepoint.get() + 1;
        self.last_savepoint.set(n);
        n
    }
}
