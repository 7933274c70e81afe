//! Binary codecs for the performance-data blobs stored in Engine Library
//! databases.
//!
//! Each blob type mirrors the byte layout written by the reference
//! hardware and software. Layouts are endian-mixed and, with the sole
//! exception of the loops blob, wrapped in a zlib frame carrying a
//! big-endian uncompressed-length prefix. Trailing bytes that are not
//! described by any published layout are preserved on decode and
//! re-emitted on encode.

pub mod codec;
pub mod error;
pub mod prelude;

mod beat_data;
mod color;
mod high_res_waveform;
mod loops;
mod overview_waveform;
mod quick_cues;
mod track_data;
mod waveform;

pub use beat_data::{BeatDataBlob, BeatGridMarkerBlob, MAX_BEATGRID_MARKERS};
pub use color::Color;
pub use error::CodecError;
pub use high_res_waveform::HighResWaveformBlob;
pub use loops::{LoopBlob, LoopsBlob, MAX_LOOPS};
pub use overview_waveform::OverviewWaveformBlob;
pub use quick_cues::{HotCueBlob, QuickCuesBlob, MAX_HOT_CUES, QUICK_CUE_SAMPLE_OFFSET_EMPTY};
pub use track_data::TrackDataBlob;
pub use waveform::{
    calculate_high_resolution_waveform_extents, calculate_overview_waveform_extents,
    waveform_quantisation_number, WaveformEntry, WaveformExtents, WaveformPoint,
    OVERVIEW_WAVEFORM_SIZE,
};
