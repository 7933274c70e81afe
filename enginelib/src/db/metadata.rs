//! The typed key-value metadata tables, `MetaData` (strings) and
//! `MetaDataInteger`. Several type ids have no documented meaning but
//! are written anyway, in the order hardware players have been observed
//! to use, for the benefit of consumers that depend on row order.

use rusqlite::{params, OptionalExtension};

use super::storage::Storage;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StrType {
    Title = 1,
    Artist = 2,
    Album = 3,
    Genre = 4,
    Comment = 5,
    Publisher = 6,
    Composer = 7,
    DurationMmSs = 10,
    EverPlayed = 12,
    FileExtension = 13,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntType {
    LastPlayedTs = 1,
    MusicalKey = 4,
    Rating = 5,
}

pub(crate) fn get_str(storage: &Storage, id: i64, t: StrType) -> Result<Option<String>> {
    let result = storage
        .conn
        .query_row(
            "SELECT text FROM MetaData WHERE id = ? AND type = ? AND text IS NOT NULL",
            params![id, t as i64],
            |row| row.get(0),
        )
        .optional()?;
    Ok(result)
}

pub(crate) fn set_str(
    storage: &Storage,
    id: i64,
    t: StrType,
    content: Option<&str>,
) -> Result<()> {
    storage.conn.execute(
        "REPLACE INTO MetaData (id, type, text) VALUES (?, ?, ?)",
        params![id, t as i64, content],
    )?;
    Ok(())
}

pub(crate) fn get_int(storage: &Storage, id: i64, t: IntType) -> Result<Option<i64>> {
    let result = storage
        .conn
        .query_row(
            "SELECT value FROM MetaDataInteger WHERE id = ? AND type = ? AND value IS NOT NULL",
            params![id, t as i64],
            |row| row.get(0),
        )
        .optional()?;
    Ok(result)
}

pub(crate) fn all_str(storage: &Storage, id: i64) -> Result<Vec<(i64, String)>> {
    let mut stmt = storage
        .conn
        .prepare("SELECT type, text FROM MetaData WHERE id = ? AND text IS NOT NULL")?;
    let rows = stmt
        .query_map([id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub(crate) fn all_int(storage: &Storage, id: i64) -> Result<Vec<(i64, i64)>> {
    let mut stmt = storage
        .conn
        .prepare("SELECT type, value FROM MetaDataInteger WHERE id = ? AND value IS NOT NULL")?;
    let rows = stmt
        .query_map([id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Bulk-writes the string metadata rows, including the undocumented
/// sentinel rows. Rows are created even for absent values.
#[allow(clippy::too_many_arguments)]
pub(crate) fn set_all_str(
    storage: &Storage,
    id: i64,
    title: Option<&str>,
    artist: Option<&str>,
    album: Option<&str>,
    genre: Option<&str>,
    comment: Option<&str>,
    publisher: Option<&str>,
    composer: Option<&str>,
    duration_mm_ss: Option<&str>,
    ever_played: Option<&str>,
    file_extension: Option<&str>,
) -> Result<()> {
    let no_value: Option<&str> = None;
    storage.conn.execute(
        "INSERT OR REPLACE INTO MetaData (id, type, text) VALUES \
         (?, ?, ?), (?, ?, ?), (?, ?, ?), (?, ?, ?), (?, ?, ?), (?, ?, ?), (?, ?, ?), \
         (?, ?, ?), (?, ?, ?), (?, ?, ?), (?, ?, ?), (?, ?, ?), (?, ?, ?), (?, ?, ?)",
        params![
            id, 1, title,
            id, 2, artist,
            id, 3, album,
            id, 4, genre,
            id, 5, comment,
            id, 6, publisher,
            id, 7, composer,
            id, 8, no_value,
            id, 9, no_value,
            id, 10, duration_mm_ss,
            id, 12, ever_played,
            id, 13, file_extension,
            id, 15, "1",
            id, 16, "1",
        ],
    )?;

    if storage.version.writes_unknown_str_17() {
        storage.conn.execute(
            "INSERT OR REPLACE INTO MetaData (id, type, text) VALUES (?, ?, ?)",
            params![id, 17, no_value],
        )?;
    }
    Ok(())
}

/// Bulk-writes the integer metadata rows. Hardware players record these
/// in the order 4, 5, 1, 2, 3, 6, 8, 7, 9, 10, 11(, 12); that order is
/// replicated here.
pub(crate) fn set_all_int(
    storage: &Storage,
    id: i64,
    musical_key: Option<i64>,
    rating: Option<i64>,
    last_played_ts: Option<i64>,
) -> Result<()> {
    let no_value: Option<i64> = None;
    storage.conn.execute(
        "INSERT OR REPLACE INTO MetaDataInteger (id, type, value) VALUES \
         (?, ?, ?), (?, ?, ?), (?, ?, ?), (?, ?, ?), (?, ?, ?), (?, ?, ?), (?, ?, ?), \
         (?, ?, ?), (?, ?, ?), (?, ?, ?), (?, ?, ?)",
        params![
            id, 4, musical_key,
            id, 5, rating,
            id, 1, last_played_ts,
            id, 2, no_value,
            id, 3, no_value,
            id, 6, no_value,
            id, 8, no_value,
            id, 7, no_value,
            id, 9, no_value,
            id, 10, no_value,
            id, 11, 1,
        ],
    )?;

    if storage.version.writes_unknown_int_12() {
        storage.conn.execute(
            "INSERT OR REPLACE INTO MetaDataInteger (id, type, value) VALUES (?, ?, ?)",
            params![id, 12, 1],
        )?;
    }
    Ok(())
}
