use std::time::Duration;

use chrono::{DateTime, Utc};
use enginelib_blob::WaveformEntry;

use super::{BeatgridMarker, HotCue, Loop, MusicalKey};

/// Where an imported track originally came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    /// UUID of the source database.
    pub source_database_uuid: String,
    /// Id of the track within the source database.
    pub source_track_id: i64,
}

/// The version-neutral payload used to create or update a track.
///
/// Every metadata field is independently optional; absence is represented
/// by `None`, never by an empty string or zero. `relative_path` is the
/// only field required when creating a track. The `id` field is populated
/// on snapshots read back from a library and must match the handle when
/// passed to an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackSnapshot {
    pub id: Option<i64>,

    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub comment: Option<String>,
    pub publisher: Option<String>,
    pub composer: Option<String>,
    pub year: Option<i32>,
    pub track_number: Option<i32>,

    pub bitrate: Option<i32>,
    /// Playing time of the track.
    pub duration: Option<Duration>,
    pub bpm: Option<f64>,
    pub key: Option<MusicalKey>,
    /// Average loudness in the interval (0, 1]; zero is never stored.
    pub average_loudness: Option<f64>,
    pub sample_count: Option<i64>,
    pub sample_rate: Option<f64>,
    /// Star rating in the range 0–100; clamped on write.
    pub rating: Option<i32>,

    /// Path to the music file, relative to the library directory.
    /// Required when creating a track.
    pub relative_path: Option<String>,
    pub file_bytes: Option<i64>,
    pub last_played_at: Option<DateTime<Utc>>,
    pub import_info: Option<ImportInfo>,

    /// The adjusted beat grid. Either empty, or at least two markers with
    /// strictly increasing indices and offsets.
    pub beatgrid: Vec<BeatgridMarker>,
    /// Sample offset of the main cue; `None` means no cue.
    pub main_cue: Option<f64>,
    /// Up to eight hot-cue slots; shorter vectors are padded with empty
    /// slots on write.
    pub hot_cues: Vec<Option<HotCue>>,
    /// Up to eight loop slots; shorter vectors are padded with empty
    /// slots on write.
    pub loops: Vec<Option<Loop>>,
    /// High-resolution waveform, sized per [`super::recommended_waveform_size`].
    pub waveform: Vec<WaveformEntry>,
}

impl TrackSnapshot {
    /// A snapshot carrying nothing but the relative path, the minimum
    /// needed to create a track.
    pub fn with_relative_path(relative_path: impl Into<String>) -> Self {
        TrackSnapshot {
            relative_path: Some(relative_path.into()),
            ..Default::default()
        }
    }

    /// True when the snapshot carries any analysis payload at all. A
    /// snapshot without one has no `PerformanceData` row.
    pub(crate) fn has_performance_payload(&self) -> bool {
        self.sample_count.is_some()
            || self.sample_rate.is_some()
            || self.average_loudness.is_some()
            || self.main_cue.is_some()
            || !self.beatgrid.is_empty()
            || self.hot_cues.iter().any(Option::is_some)
            || self.loops.iter().any(Option::is_some)
            || !self.waveform.is_empty()
    }
}
