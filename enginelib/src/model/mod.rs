//! Version-neutral domain types shared by every schema backend.

mod beatgrid;
mod cues;
mod key;
mod snapshot;

pub use beatgrid::{normalize_beatgrid, BeatgridMarker};
pub use cues::{HotCue, Loop, STANDARD_PAD_COLORS};
pub use key::MusicalKey;
pub use snapshot::{ImportInfo, TrackSnapshot};

pub use enginelib_blob::{Color, WaveformEntry, WaveformPoint};

/// The number of high-resolution waveform entries a caller should supply
/// for a track with the given sampling, at the required samples-per-entry.
pub fn recommended_waveform_size(sample_count: u64, sample_rate: f64) -> u64 {
    enginelib_blob::calculate_high_resolution_waveform_extents(sample_count, sample_rate).size
}
