//! The schema registry: per-version creators and validators.

mod create;
mod spec;
mod verify;

use rusqlite::Connection;

use crate::version::SchemaVersion;
use crate::Result;

pub(crate) use create::CURRENT_PLAYED_INDICATOR_SEED;

/// Type discriminators of the generic `List` table used by 1.18.0 and the
/// v2 family.
pub(crate) const LIST_TYPE_PLAYLIST: i64 = 1;
pub(crate) const LIST_TYPE_HISTORY: i64 = 2;
pub(crate) const LIST_TYPE_PREPARE: i64 = 3;
pub(crate) const LIST_TYPE_CRATE: i64 = 4;

/// A creator/validator pair for one schema version.
pub trait SchemaOps {
    /// Emits the DDL and seed rows for a fresh database.
    fn create(&self, conn: &Connection) -> Result<()>;

    /// Introspects the live schema and fails with
    /// [`crate::Error::SchemaMismatch`] on any deviation.
    fn verify(&self, conn: &Connection) -> Result<()>;
}

struct VersionSchemaOps {
    version: SchemaVersion,
}

impl SchemaOps for VersionSchemaOps {
    fn create(&self, conn: &Connection) -> Result<()> {
        create::create_schema(conn, self.version)
    }

    fn verify(&self, conn: &Connection) -> Result<()> {
        verify::verify_schema(conn, self.version)
    }
}

/// Returns the creator/validator for a supported version.
pub fn schema_ops(version: SchemaVersion) -> Box<dyn SchemaOps> {
    Box::new(VersionSchemaOps { version })
}
