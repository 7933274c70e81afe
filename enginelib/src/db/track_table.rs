//! Row-level access to the `Track` table. The column set grows with the
//! schema version, so every statement is assembled from the
//! version-correct column list.

use rusqlite::types::ToSql;
use rusqlite::OptionalExtension;

use super::storage::Storage;
use crate::error::Error;
use crate::version::SchemaVersion;
use crate::Result;

/// The id of the seeded "no album art" sentinel row.
pub(crate) const NO_ALBUM_ART_ID: i64 = 1;

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TrackRow {
    pub play_order: Option<i64>,
    pub length: Option<i64>,
    pub length_calculated: Option<i64>,
    pub bpm: Option<i64>,
    pub year: Option<i64>,
    pub relative_path: Option<String>,
    pub filename: Option<String>,
    pub bitrate: Option<i64>,
    pub bpm_analyzed: Option<f64>,
    pub track_type: Option<i64>,
    pub is_external_track: Option<i64>,
    pub uuid_of_external_database: Option<String>,
    pub id_track_in_external_database: Option<i64>,
    pub album_art_id: Option<i64>,
    pub pdb_import_key: Option<i64>,
    pub file_bytes: Option<i64>,
    pub uri: Option<String>,
    pub is_beatgrid_locked: Option<i64>,
}

fn columns(version: SchemaVersion) -> Vec<&'static str> {
    let mut columns = vec![
        "playOrder",
        "length",
        "lengthCalculated",
        "bpm",
        "year",
        "path",
        "filename",
        "bitrate",
        "bpmAnalyzed",
        "trackType",
        "isExternalTrack",
        "uuidOfExternalDatabase",
        "idTrackInExternalDatabase",
        "idAlbumArt",
    ];
    if version.has_pdb_import_key() {
        columns.push("pdbImportKey");
    }
    if version.has_file_bytes_and_uri() {
        columns.push("fileBytes");
        columns.push("uri");
    }
    if version.has_beatgrid_locked() {
        columns.push("isBeatGridLocked");
    }
    columns
}

fn values<'a>(row: &'a TrackRow, version: SchemaVersion) -> Vec<&'a dyn ToSql> {
    let mut values: Vec<&dyn ToSql> = vec![
        &row.play_order,
        &row.length,
        &row.length_calculated,
        &row.bpm,
        &row.year,
        &row.relative_path,
        &row.filename,
        &row.bitrate,
        &row.bpm_analyzed,
        &row.track_type,
        &row.is_external_track,
        &row.uuid_of_external_database,
        &row.id_track_in_external_database,
        &row.album_art_id,
    ];
    if version.has_pdb_import_key() {
        values.push(&row.pdb_import_key);
    }
    if version.has_file_bytes_and_uri() {
        values.push(&row.file_bytes);
        values.push(&row.uri);
    }
    if version.has_beatgrid_locked() {
        values.push(&row.is_beatgrid_locked);
    }
    values
}

pub(crate) fn insert(storage: &Storage, row: &TrackRow) -> Result<i64> {
    let columns = columns(storage.version);
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO Track ({}) VALUES ({placeholders})",
        columns.join(", ")
    );
    storage
        .conn
        .execute(&sql, &values(row, storage.version)[..])?;
    Ok(storage.conn.last_insert_rowid())
}

pub(crate) fn update(storage: &Storage, id: i64, row: &TrackRow) -> Result<()> {
    let assignments: Vec<String> = columns(storage.version)
        .iter()
        .map(|c| format!("{c} = ?"))
        .collect();
    let sql = format!("UPDATE Track SET {} WHERE id = ?", assignments.join(", "));

    let mut params = values(row, storage.version);
    params.push(&id);
    storage.conn.execute(&sql, &params[..])?;
    Ok(())
}

pub(crate) fn get(storage: &Storage, id: i64) -> Result<TrackRow> {
    let version = storage.version;
    let sql = format!(
        "SELECT {} FROM Track WHERE id = ?",
        columns(version).join(", ")
    );

    storage
        .conn
        .query_row(&sql, [id], |r| {
            let mut row = TrackRow {
                play_order: r.get(0)?,
                length: r.get(1)?,
                length_calculated: r.get(2)?,
                bpm: r.get(3)?,
                year: r.get(4)?,
                relative_path: r.get(5)?,
                filename: r.get(6)?,
                bitrate: r.get(7)?,
                bpm_analyzed: r.get(8)?,
                track_type: r.get(9)?,
                is_external_track: r.get(10)?,
                uuid_of_external_database: r.get(11)?,
                id_track_in_external_database: r.get(12)?,
                album_art_id: r.get(13)?,
                ..Default::default()
            };
            let mut i = 14;
            if version.has_pdb_import_key() {
                row.pdb_import_key = r.get(i)?;
                i += 1;
            }
            if version.has_file_bytes_and_uri() {
                row.file_bytes = r.get(i)?;
                row.uri = r.get(i + 1)?;
                i += 2;
            }
            if version.has_beatgrid_locked() {
                row.is_beatgrid_locked = r.get(i)?;
            }
            Ok(row)
        })
        .optional()?
        .ok_or(Error::TrackDeleted { id })
}

pub(crate) fn exists(storage: &Storage, id: i64) -> Result<bool> {
    let count: i64 = storage
        .conn
        .query_row("SELECT COUNT(*) FROM Track WHERE id = ?", [id], |row| {
            row.get(0)
        })?;
    if count > 1 {
        return Err(Error::inconsistency_for(
            "more than one track with the same id",
            id,
        ));
    }
    Ok(count == 1)
}

pub(crate) fn all_ids(storage: &Storage) -> Result<Vec<i64>> {
    // Some schema versions have triggers that leave NULL rows behind
    // after a delete, so only rows with a path are real tracks.
    let mut stmt = storage
        .conn
        .prepare("SELECT id FROM Track WHERE path IS NOT NULL ORDER BY id")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub(crate) fn ids_by_relative_path(storage: &Storage, relative_path: &str) -> Result<Vec<i64>> {
    let mut stmt = storage
        .conn
        .prepare("SELECT id FROM Track WHERE path = ? ORDER BY id")?;
    let ids = stmt
        .query_map([relative_path], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub(crate) fn remove(storage: &Storage, id: i64) -> Result<()> {
    // Crate membership rows go with the track via ON DELETE CASCADE; the
    // performance row lives in a separate file on v1 and is removed
    // explicitly on both families. Playlist entities are deleted through
    // an explicit statement so the chain-bridging trigger sees them.
    storage
        .conn
        .execute("DELETE FROM PerformanceData WHERE id = ?", [id])?;
    if storage.version.supports_playlists() {
        storage
            .conn
            .execute("DELETE FROM PlaylistEntity WHERE trackId = ?", [id])?;
    }
    storage.conn.execute("DELETE FROM Track WHERE id = ?", [id])?;
    Ok(())
}
