//! Conversion between the version-neutral track snapshot and the
//! version-specific row and blob shapes, including every derived field
//! populated on write.

use std::time::Duration;

use chrono::DateTime;
use enginelib_blob::{
    calculate_high_resolution_waveform_extents, calculate_overview_waveform_extents,
    BeatDataBlob, BeatGridMarkerBlob, HighResWaveformBlob, HotCueBlob, LoopBlob, LoopsBlob,
    OverviewWaveformBlob, QuickCuesBlob, TrackDataBlob, MAX_HOT_CUES, MAX_LOOPS,
    OVERVIEW_WAVEFORM_SIZE,
};

use super::metadata::{self, IntType, StrType};
use super::performance::{self, PerformanceRow};
use super::storage::Storage;
use super::track_table::{self, TrackRow, NO_ALBUM_ART_ID};
use super::transaction::TransactionScope;
use crate::error::Error;
use crate::model::{BeatgridMarker, HotCue, ImportInfo, Loop, MusicalKey, TrackSnapshot};
use crate::util;
use crate::Result;
use std::rc::Rc;

const DEFAULT_TRACK_TYPE: i64 = 1;
const DEFAULT_PDB_IMPORT_KEY: i64 = 0;

/// Rating values are clamped to this range on write; a stored zero is
/// the absent representation.
pub(crate) const RATING_NONE: i64 = 0;

struct LengthFields {
    length: Option<i64>,
    length_calculated: Option<i64>,
    mm_ss: Option<String>,
}

fn to_length_fields(
    duration: Option<Duration>,
    sample_count: Option<i64>,
    sample_rate: Option<f64>,
) -> LengthFields {
    let length = duration.map(|d| d.as_secs() as i64);
    let mm_ss = length.map(util::format_mm_ss);

    // A zero sample rate is interpreted as no sample rate.
    let length_calculated = match (sample_count, sample_rate) {
        (Some(count), Some(rate)) if rate != 0.0 => Some(count / rate as i64),
        _ => None,
    };

    LengthFields {
        length,
        length_calculated,
        mm_ss,
    }
}

/// BPM inferred from the first two beat-grid markers, used when the
/// snapshot does not carry an explicit BPM.
fn beatgrid_bpm(sample_rate: Option<f64>, beatgrid: &[BeatgridMarker]) -> Option<f64> {
    let rate = sample_rate?;
    let (first, second) = match beatgrid {
        [first, second, ..] => (first, second),
        _ => return None,
    };
    if first.sample_offset == second.sample_offset {
        return None;
    }
    Some(
        rate * 60.0 * (second.index - first.index) as f64
            / (second.sample_offset - first.sample_offset),
    )
}

fn to_track_data(snapshot: &TrackSnapshot) -> TrackDataBlob {
    TrackDataBlob::new(
        snapshot.sample_rate.unwrap_or(0.0),
        snapshot.sample_count.unwrap_or(0),
        snapshot.average_loudness.unwrap_or(0.0),
        snapshot.key.map(MusicalKey::as_number).unwrap_or(0),
    )
}

fn to_beat_data(snapshot: &TrackSnapshot) -> BeatDataBlob {
    let markers: Vec<BeatGridMarkerBlob> = snapshot
        .beatgrid
        .iter()
        .map(|m| BeatGridMarkerBlob::new(m.index, m.sample_offset))
        .collect();
    BeatDataBlob {
        sample_rate: snapshot.sample_rate.unwrap_or(0.0),
        sample_count: snapshot.sample_count.unwrap_or(0) as f64,
        is_beatgrid_set: true,
        default_beatgrid: markers.clone(),
        adjusted_beatgrid: markers,
        extra: Vec::new(),
    }
}

/// The snapshot-side beat-grid invariants: empty, or at least two
/// markers strictly increasing in both index and offset. Violations are
/// caller errors and must not reach the blob round-trip check.
pub(crate) fn ensure_valid_beatgrid(beatgrid: &[BeatgridMarker]) -> Result<()> {
    if beatgrid.len() == 1 {
        return Err(Error::invalid_snapshot(
            "beatgrid must contain at least two markers when non-empty",
        ));
    }
    for pair in beatgrid.windows(2) {
        if pair[1].index <= pair[0].index {
            return Err(Error::invalid_snapshot(
                "beatgrid indices must be strictly increasing",
            ));
        }
        if pair[1].sample_offset <= pair[0].sample_offset {
            return Err(Error::invalid_snapshot(
                "beatgrid sample offsets must be strictly increasing",
            ));
        }
    }
    Ok(())
}

fn to_quick_cues(snapshot: &TrackSnapshot) -> Result<QuickCuesBlob> {
    if snapshot.hot_cues.len() > MAX_HOT_CUES {
        return Err(Error::HotCuesOverflow);
    }
    let mut hot_cues: Vec<Option<HotCueBlob>> = snapshot
        .hot_cues
        .iter()
        .map(|slot| {
            slot.as_ref().map(|cue| HotCueBlob {
                label: cue.label.clone(),
                sample_offset: cue.sample_offset,
                color: cue.color,
            })
        })
        .collect();
    hot_cues.resize(MAX_HOT_CUES, None);

    let main_cue = snapshot.main_cue.unwrap_or(0.0);
    Ok(QuickCuesBlob {
        hot_cues,
        adjusted_main_cue: main_cue,
        default_main_cue: main_cue,
        extra: Vec::new(),
    })
}

fn to_loops(snapshot: &TrackSnapshot) -> Result<LoopsBlob> {
    if snapshot.loops.len() > MAX_LOOPS {
        return Err(Error::LoopsOverflow);
    }
    let mut loops: Vec<Option<LoopBlob>> = snapshot
        .loops
        .iter()
        .map(|slot| {
            slot.as_ref().map(|l| LoopBlob {
                label: l.label.clone(),
                start_sample_offset: l.start_sample_offset,
                end_sample_offset: l.end_sample_offset,
                color: l.color,
            })
        })
        .collect();
    loops.resize(MAX_LOOPS, None);
    Ok(LoopsBlob { loops })
}

/// Derives the fixed-size overview waveform from the caller's
/// high-resolution waveform by index resampling. Opacity is not stored
/// in the overview format and is pinned to the opaque sentinel so the
/// write-side round-trip check can compare structurally.
fn to_overview_waveform(snapshot: &TrackSnapshot) -> OverviewWaveformBlob {
    let (count, rate) = match (snapshot.sample_count, snapshot.sample_rate) {
        (Some(count), Some(rate)) if !snapshot.waveform.is_empty() => (count, rate),
        _ => return OverviewWaveformBlob::default(),
    };

    let extents = calculate_overview_waveform_extents(count.max(0) as u64, rate);
    if extents.size == 0 {
        return OverviewWaveformBlob::default();
    }

    let source = &snapshot.waveform;
    let mut waveform = Vec::with_capacity(extents.size as usize);
    for i in 0..extents.size {
        let mut entry = source[(source.len() as u64 * (2 * i + 1)
            / (2 * OVERVIEW_WAVEFORM_SIZE)) as usize];
        entry.low.opacity = 255;
        entry.mid.opacity = 255;
        entry.high.opacity = 255;
        waveform.push(entry);
    }

    OverviewWaveformBlob {
        samples_per_entry: extents.samples_per_entry,
        waveform,
        extra: Vec::new(),
    }
}

fn to_high_res_waveform(snapshot: &TrackSnapshot) -> HighResWaveformBlob {
    let samples_per_entry = match (snapshot.sample_count, snapshot.sample_rate) {
        (Some(count), Some(rate)) => {
            calculate_high_resolution_waveform_extents(count.max(0) as u64, rate)
                .samples_per_entry
        }
        _ => 0.0,
    };
    HighResWaveformBlob {
        samples_per_entry,
        waveform: snapshot.waveform.clone(),
        extra: Vec::new(),
    }
}

fn to_track_row(snapshot: &TrackSnapshot, relative_path: &str) -> TrackRow {
    let filename = util::filename(relative_path);
    let length_fields = to_length_fields(
        snapshot.duration,
        snapshot.sample_count,
        snapshot.sample_rate,
    );
    let bpm_analyzed = snapshot
        .bpm
        .or_else(|| beatgrid_bpm(snapshot.sample_rate, &snapshot.beatgrid));

    let (is_external, external_uuid, external_id) = match &snapshot.import_info {
        Some(info) => (
            1,
            Some(info.source_database_uuid.clone()),
            Some(info.source_track_id),
        ),
        None => (0, None, None),
    };

    TrackRow {
        play_order: snapshot.track_number.map(i64::from),
        length: length_fields.length,
        length_calculated: length_fields.length_calculated,
        bpm: snapshot.bpm.map(|b| b as i64),
        year: snapshot.year.map(i64::from),
        relative_path: Some(relative_path.to_owned()),
        filename: Some(filename),
        bitrate: snapshot.bitrate.map(i64::from),
        bpm_analyzed,
        track_type: Some(DEFAULT_TRACK_TYPE),
        is_external_track: Some(is_external),
        uuid_of_external_database: external_uuid,
        id_track_in_external_database: external_id,
        album_art_id: Some(NO_ALBUM_ART_ID),
        pdb_import_key: Some(DEFAULT_PDB_IMPORT_KEY),
        file_bytes: snapshot.file_bytes,
        uri: None,
        is_beatgrid_locked: Some(0),
    }
}

fn write_metadata(storage: &Storage, id: i64, snapshot: &TrackSnapshot) -> Result<()> {
    let length_fields = to_length_fields(
        snapshot.duration,
        snapshot.sample_count,
        snapshot.sample_rate,
    );
    let filename = snapshot
        .relative_path
        .as_deref()
        .map(util::filename)
        .unwrap_or_default();
    let extension = util::file_extension(&filename);
    let ever_played = snapshot.last_played_at.map(|_| "1");

    metadata::set_all_str(
        storage,
        id,
        snapshot.title.as_deref(),
        snapshot.artist.as_deref(),
        snapshot.album.as_deref(),
        snapshot.genre.as_deref(),
        snapshot.comment.as_deref(),
        snapshot.publisher.as_deref(),
        snapshot.composer.as_deref(),
        length_fields.mm_ss.as_deref(),
        ever_played,
        extension.as_deref(),
    )?;

    let clamped_rating = snapshot.rating.map(|r| i64::from(r.clamp(0, 100)));
    metadata::set_all_int(
        storage,
        id,
        snapshot.key.map(|k| i64::from(k.as_number())),
        clamped_rating,
        snapshot.last_played_at.map(|t| t.timestamp()),
    )?;
    Ok(())
}

fn write_performance(storage: &Storage, id: i64, snapshot: &TrackSnapshot) -> Result<()> {
    if snapshot.has_performance_payload() {
        performance::set(
            storage,
            id,
            &to_track_data(snapshot),
            &to_high_res_waveform(snapshot),
            &to_overview_waveform(snapshot),
            &to_beat_data(snapshot),
            &to_quick_cues(snapshot)?,
            &to_loops(snapshot)?,
        )
    } else {
        performance::clear(storage, id)
    }
}

pub(crate) fn create_track(storage: &Rc<Storage>, snapshot: &TrackSnapshot) -> Result<i64> {
    if snapshot.id.is_some() {
        return Err(Error::invalid_snapshot(
            "snapshot must not carry an id when creating a track",
        ));
    }
    let relative_path = snapshot.relative_path.as_deref().ok_or_else(|| {
        Error::invalid_snapshot("snapshot does not contain the required relative_path field")
    })?;

    // Fail on invalid analysis payloads before any row is written.
    ensure_valid_beatgrid(&snapshot.beatgrid)?;
    let quick_cues = to_quick_cues(snapshot)?;
    let loops = to_loops(snapshot)?;

    let scope = TransactionScope::begin(Rc::clone(storage))?;
    let id = track_table::insert(storage, &to_track_row(snapshot, relative_path))?;
    write_metadata(storage, id, snapshot)?;
    if snapshot.has_performance_payload() {
        performance::set(
            storage,
            id,
            &to_track_data(snapshot),
            &to_high_res_waveform(snapshot),
            &to_overview_waveform(snapshot),
            &to_beat_data(snapshot),
            &quick_cues,
            &loops,
        )?;
    }
    scope.commit()?;
    Ok(id)
}

pub(crate) fn update_track(
    storage: &Rc<Storage>,
    id: i64,
    snapshot: &TrackSnapshot,
) -> Result<()> {
    if let Some(snapshot_id) = snapshot.id {
        if snapshot_id != id {
            return Err(Error::invalid_snapshot(format!(
                "snapshot carries id {snapshot_id} but was applied to track {id}"
            )));
        }
    }
    let relative_path = snapshot.relative_path.as_deref().ok_or_else(|| {
        Error::invalid_snapshot("snapshot does not contain the required relative_path field")
    })?;
    ensure_valid_beatgrid(&snapshot.beatgrid)?;
    if !track_table::exists(storage, id)? {
        return Err(Error::TrackDeleted { id });
    }

    let scope = TransactionScope::begin(Rc::clone(storage))?;
    track_table::update(storage, id, &to_track_row(snapshot, relative_path))?;
    write_metadata(storage, id, snapshot)?;
    write_performance(storage, id, snapshot)?;
    scope.commit()?;
    Ok(())
}

fn sentinel_to_option_f64(value: f64) -> Option<f64> {
    if value == 0.0 {
        None
    } else {
        Some(value)
    }
}

pub(crate) fn read_snapshot(storage: &Storage, id: i64) -> Result<TrackSnapshot> {
    let row = track_table::get(storage, id)?;
    let perf = performance::get(storage, id)?.unwrap_or_else(PerformanceRow::default);

    let mut snapshot = TrackSnapshot {
        id: Some(id),
        relative_path: row.relative_path,
        bitrate: row.bitrate.map(|b| b as i32),
        year: row.year.map(|y| y as i32),
        track_number: row.play_order.map(|n| n as i32),
        file_bytes: row.file_bytes,
        bpm: row.bpm_analyzed.or(row.bpm.map(|b| b as f64)),
        ..Default::default()
    };

    if row.is_external_track == Some(1) {
        if let (Some(uuid), Some(foreign_id)) =
            (row.uuid_of_external_database, row.id_track_in_external_database)
        {
            snapshot.import_info = Some(ImportInfo {
                source_database_uuid: uuid,
                source_track_id: foreign_id,
            });
        }
    }

    if let Some(track_data) = &perf.track_data {
        snapshot.sample_rate = sentinel_to_option_f64(track_data.sample_rate);
        snapshot.sample_count = if track_data.sample_count != 0 {
            Some(track_data.sample_count)
        } else {
            None
        };
        snapshot.average_loudness = sentinel_to_option_f64(track_data.average_loudness_low);
        if track_data.key != 0 {
            snapshot.key = MusicalKey::from_number(track_data.key);
        }
    }

    // Prefer the stored playing time; derive it from the sampling
    // information when the column was never populated.
    snapshot.duration = match (row.length, snapshot.sample_count, snapshot.sample_rate) {
        (Some(seconds), _, _) => Some(Duration::from_secs(seconds.max(0) as u64)),
        (None, Some(count), Some(rate)) if rate > 0.0 => {
            Some(Duration::from_millis((count as f64 / rate * 1000.0) as u64))
        }
        _ => None,
    };

    if let Some(beat_data) = &perf.beat_data {
        snapshot.beatgrid = beat_data
            .adjusted_beatgrid
            .iter()
            .map(|m| BeatgridMarker::new(m.beat_index, m.sample_offset))
            .collect();
    }

    if let Some(quick_cues) = &perf.quick_cues {
        snapshot.main_cue = sentinel_to_option_f64(quick_cues.adjusted_main_cue);
        snapshot.hot_cues = quick_cues
            .hot_cues
            .iter()
            .map(|slot| {
                slot.as_ref().map(|cue| HotCue {
                    label: cue.label.clone(),
                    sample_offset: cue.sample_offset,
                    color: cue.color,
                })
            })
            .collect();
    }

    if let Some(loops) = &perf.loops {
        snapshot.loops = loops
            .loops
            .iter()
            .map(|slot| {
                slot.as_ref().map(|l| Loop {
                    label: l.label.clone(),
                    start_sample_offset: l.start_sample_offset,
                    end_sample_offset: l.end_sample_offset,
                    color: l.color,
                })
            })
            .collect();
    }

    if let Some(high_res) = &perf.high_res_waveform {
        snapshot.waveform = high_res.waveform.clone();
    }

    for (meta_type, text) in metadata::all_str(storage, id)? {
        match meta_type {
            t if t == StrType::Title as i64 => snapshot.title = Some(text),
            t if t == StrType::Artist as i64 => snapshot.artist = Some(text),
            t if t == StrType::Album as i64 => snapshot.album = Some(text),
            t if t == StrType::Genre as i64 => snapshot.genre = Some(text),
            t if t == StrType::Comment as i64 => snapshot.comment = Some(text),
            t if t == StrType::Publisher as i64 => snapshot.publisher = Some(text),
            t if t == StrType::Composer as i64 => snapshot.composer = Some(text),
            _ => {}
        }
    }

    for (meta_type, value) in metadata::all_int(storage, id)? {
        match meta_type {
            t if t == IntType::LastPlayedTs as i64 => {
                snapshot.last_played_at = DateTime::from_timestamp(value, 0);
            }
            t if t == IntType::Rating as i64 => {
                if value != RATING_NONE {
                    snapshot.rating = Some(value as i32);
                }
            }
            t if t == IntType::MusicalKey as i64 => {
                if snapshot.key.is_none() {
                    snapshot.key = MusicalKey::from_number(value as i32);
                }
            }
            _ => {}
        }
    }

    Ok(snapshot)
}
