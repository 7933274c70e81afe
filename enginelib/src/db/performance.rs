//! Row-level access to the `PerformanceData` table: six independently
//! encoded blob columns plus a handful of flags.
//!
//! Every write re-decodes its own encoded output and compares it with the
//! input before touching the database. A mismatch can only be a bug in
//! the codec layer, never a user error, and is reported as a database
//! inconsistency.

use enginelib_blob::{
    BeatDataBlob, HighResWaveformBlob, LoopsBlob, OverviewWaveformBlob, QuickCuesBlob,
    TrackDataBlob,
};
use rusqlite::types::ToSql;
use rusqlite::{params, OptionalExtension};

use super::storage::Storage;
use crate::error::Error;
use crate::version::SchemaVersion;
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PerformanceRow {
    pub track_data: Option<TrackDataBlob>,
    pub high_res_waveform: Option<HighResWaveformBlob>,
    pub overview_waveform: Option<OverviewWaveformBlob>,
    pub beat_data: Option<BeatDataBlob>,
    pub quick_cues: Option<QuickCuesBlob>,
    pub loops: Option<LoopsBlob>,
}

fn roundtrip_error(id: i64, column: &str) -> Error {
    Error::inconsistency_for(
        format!(
            "data for column {column} is not invariant under an encode/decode round trip; \
             this is a bug in enginelib"
        ),
        id,
    )
}

fn encode_track_data(
    version: SchemaVersion,
    id: i64,
    blob: &TrackDataBlob,
) -> Result<Vec<u8>> {
    let (encoded, decoded) = if version.three_band_loudness() {
        let encoded = blob.encode_three_band()?;
        (encoded.clone(), TrackDataBlob::decode_three_band(&encoded)?)
    } else {
        let encoded = blob.encode_single_band()?;
        (
            encoded.clone(),
            TrackDataBlob::decode_single_band(&encoded)?,
        )
    };
    if decoded != *blob {
        return Err(roundtrip_error(id, "trackData"));
    }
    Ok(encoded)
}

macro_rules! encode_checked {
    ($id:expr, $column:literal, $blob:expr, $decode:path) => {{
        let encoded = $blob.encode()?;
        if $decode(&encoded)? != *$blob {
            return Err(roundtrip_error($id, $column));
        }
        encoded
    }};
}

pub(crate) fn get(storage: &Storage, id: i64) -> Result<Option<PerformanceRow>> {
    let blobs = storage
        .conn
        .query_row(
            "SELECT trackData, highResolutionWaveFormData, overviewWaveFormData, beatData, \
             quickCues, loops FROM PerformanceData WHERE id = ?",
            [id],
            |row| {
                Ok((
                    row.get::<_, Option<Vec<u8>>>(0)?,
                    row.get::<_, Option<Vec<u8>>>(1)?,
                    row.get::<_, Option<Vec<u8>>>(2)?,
                    row.get::<_, Option<Vec<u8>>>(3)?,
                    row.get::<_, Option<Vec<u8>>>(4)?,
                    row.get::<_, Option<Vec<u8>>>(5)?,
                ))
            },
        )
        .optional()?;

    let (track_data, high_res, overview, beat_data, quick_cues, loops) = match blobs {
        Some(blobs) => blobs,
        None => return Ok(None),
    };

    let decode_track = if storage.version.three_band_loudness() {
        TrackDataBlob::decode_three_band
    } else {
        TrackDataBlob::decode_single_band
    };

    fn non_empty(bytes: Option<Vec<u8>>) -> Option<Vec<u8>> {
        bytes.filter(|b| !b.is_empty())
    }

    Ok(Some(PerformanceRow {
        track_data: non_empty(track_data).map(|b| decode_track(&b)).transpose()?,
        high_res_waveform: non_empty(high_res)
            .map(|b| HighResWaveformBlob::decode(&b))
            .transpose()?,
        overview_waveform: non_empty(overview)
            .map(|b| OverviewWaveformBlob::decode(&b))
            .transpose()?,
        beat_data: non_empty(beat_data)
            .map(|b| BeatDataBlob::decode(&b))
            .transpose()?,
        quick_cues: non_empty(quick_cues)
            .map(|b| QuickCuesBlob::decode(&b))
            .transpose()?,
        loops: non_empty(loops).map(|b| LoopsBlob::decode(&b)).transpose()?,
    }))
}

/// Creates or replaces the `PerformanceData` row for a track with freshly
/// encoded blobs. The track is marked analyzed but not rendered, and all
/// foreign-ecosystem flags are cleared.
pub(crate) fn set(
    storage: &Storage,
    id: i64,
    track_data: &TrackDataBlob,
    high_res_waveform: &HighResWaveformBlob,
    overview_waveform: &OverviewWaveformBlob,
    beat_data: &BeatDataBlob,
    quick_cues: &QuickCuesBlob,
    loops: &LoopsBlob,
) -> Result<()> {
    let track_bytes = encode_track_data(storage.version, id, track_data)?;
    let high_res_bytes = encode_checked!(id, "highResolutionWaveFormData", high_res_waveform, HighResWaveformBlob::decode);
    let overview_bytes = encode_checked!(id, "overviewWaveFormData", overview_waveform, OverviewWaveformBlob::decode);
    let beat_bytes = encode_checked!(id, "beatData", beat_data, BeatDataBlob::decode);
    let cues_bytes = encode_checked!(id, "quickCues", quick_cues, QuickCuesBlob::decode);
    let loops_bytes = encode_checked!(id, "loops", loops, LoopsBlob::decode);

    let mut columns = vec![
        "id",
        "isAnalyzed",
        "isRendered",
        "trackData",
        "highResolutionWaveFormData",
        "overviewWaveFormData",
        "beatData",
        "quickCues",
        "loops",
        "hasSeratoValues",
    ];
    let is_analyzed = 1i64;
    let is_rendered = 0i64;
    let no = 0i64;
    let mut values: Vec<&dyn ToSql> = vec![
        &id,
        &is_analyzed,
        &is_rendered,
        &track_bytes,
        &high_res_bytes,
        &overview_bytes,
        &beat_bytes,
        &cues_bytes,
        &loops_bytes,
        &no,
    ];
    if storage.version.has_rekordbox_flag() {
        columns.push("hasRekordboxValues");
        values.push(&no);
    }
    if storage.version.has_traktor_flag() {
        columns.push("hasTraktorValues");
        values.push(&no);
    }

    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT OR REPLACE INTO PerformanceData ({}) VALUES ({placeholders})",
        columns.join(", ")
    );
    storage.conn.execute(&sql, &values[..])?;
    Ok(())
}

pub(crate) fn clear(storage: &Storage, id: i64) -> Result<()> {
    storage
        .conn
        .execute("DELETE FROM PerformanceData WHERE id = ?", [id])?;
    Ok(())
}

pub(crate) fn get_beat_data(storage: &Storage, id: i64) -> Result<BeatDataBlob> {
    let blob: Option<Option<Vec<u8>>> = storage
        .conn
        .query_row(
            "SELECT beatData FROM PerformanceData WHERE id = ?",
            [id],
            |row| row.get(0),
        )
        .optional()?;
    match blob.flatten().filter(|b| !b.is_empty()) {
        Some(bytes) => Ok(BeatDataBlob::decode(&bytes)?),
        None => Ok(BeatDataBlob::default()),
    }
}

pub(crate) fn set_beat_data(storage: &Storage, id: i64, beat_data: &BeatDataBlob) -> Result<()> {
    let encoded = encode_checked!(id, "beatData", beat_data, BeatDataBlob::decode);

    let row_count: i64 = storage.conn.query_row(
        "SELECT COUNT(*) FROM PerformanceData WHERE id = ?",
        [id],
        |row| row.get(0),
    )?;
    if row_count == 0 {
        set(
            storage,
            id,
            &TrackDataBlob::default(),
            &HighResWaveformBlob::default(),
            &OverviewWaveformBlob::default(),
            beat_data,
            &QuickCuesBlob::default(),
            &LoopsBlob::default(),
        )?;
        return Ok(());
    }

    storage.conn.execute(
        "UPDATE PerformanceData SET beatData = ? WHERE id = ?",
        params![encoded, id],
    )?;
    Ok(())
}
