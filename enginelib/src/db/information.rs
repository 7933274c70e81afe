use rusqlite::OptionalExtension;

use super::storage::Storage;
use crate::error::Error;
use crate::Result;

/// The singleton `Information` row of a database file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InformationRow {
    pub id: i64,
    pub uuid: String,
    pub schema_version_major: i64,
    pub schema_version_minor: i64,
    pub schema_version_patch: i64,
    /// Opaque counter seeded with a magic constant on create; its
    /// derivation rule is unknown, so it is never rewritten.
    pub current_played_indicator: i64,
    pub last_import_read_counter: i64,
}

/// One row of the 2.x `ChangeLog` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeLogRow {
    pub id: i64,
    pub track_id: i64,
}

pub(crate) fn get(storage: &Storage) -> Result<InformationRow> {
    // Note: the played-indicator column name misspells "indicator"; the
    // typo is part of the on-disk contract.
    storage
        .conn
        .query_row(
            "SELECT id, uuid, schemaVersionMajor, schemaVersionMinor, schemaVersionPatch, \
             currentPlayedIndiciator, lastRekordBoxLibraryImportReadCounter FROM Information",
            [],
            |row| {
                Ok(InformationRow {
                    id: row.get(0)?,
                    uuid: row.get(1)?,
                    schema_version_major: row.get(2)?,
                    schema_version_minor: row.get(3)?,
                    schema_version_patch: row.get(4)?,
                    current_played_indicator: row.get(5)?,
                    last_import_read_counter: row.get(6)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| Error::inconsistency("the Information table has no rows"))
}

pub(crate) fn change_log(storage: &Storage, after: Option<i64>) -> Result<Vec<ChangeLogRow>> {
    if !storage.version.has_change_log() {
        return Err(Error::UnsupportedOperation {
            what: "change log",
        });
    }

    let map = |row: &rusqlite::Row<'_>| {
        Ok(ChangeLogRow {
            id: row.get(0)?,
            track_id: row.get(1)?,
        })
    };
    let mut rows = Vec::new();
    match after {
        Some(id) => {
            let mut stmt = storage
                .conn
                .prepare("SELECT id, trackId FROM ChangeLog WHERE id > ? ORDER BY id")?;
            for row in stmt.query_map([id], map)? {
                rows.push(row?);
            }
        }
        None => {
            let mut stmt = storage
                .conn
                .prepare("SELECT id, trackId FROM ChangeLog ORDER BY id")?;
            for row in stmt.query_map([], map)? {
                rows.push(row?);
            }
        }
    }
    Ok(rows)
}
