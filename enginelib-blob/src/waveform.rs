/// A single sub-band measurement within a waveform entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaveformPoint {
    pub value: u8,
    pub opacity: u8,
}

impl WaveformPoint {
    pub const fn new(value: u8, opacity: u8) -> Self {
        WaveformPoint { value, opacity }
    }
}

/// One waveform entry, split into low/mid/high frequency bands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaveformEntry {
    pub low: WaveformPoint,
    pub mid: WaveformPoint,
    pub high: WaveformPoint,
}

impl WaveformEntry {
    pub const fn new(low: WaveformPoint, mid: WaveformPoint, high: WaveformPoint) -> Self {
        WaveformEntry { low, mid, high }
    }
}

/// The dimensions of a stored waveform: how many entries it has, and how
/// many audio samples each entry represents.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaveformExtents {
    pub size: u64,
    pub samples_per_entry: f64,
}

/// Number of entries in an overview waveform, fixed for all tracks.
pub const OVERVIEW_WAVEFORM_SIZE: u64 = 1024;

/// Several numbers written to the waveform performance data are rounded to
/// multiples of a "quantisation number": the sample rate divided by 105,
/// rounded down to the nearest multiple of two.
pub fn waveform_quantisation_number(sample_rate: f64) -> i64 {
    (sample_rate as i64 / 210) * 2
}

/// In high-resolution waveforms, the samples-per-entry is the quantisation
/// number itself, giving roughly 105 entries per second of audio.
pub fn calculate_high_resolution_waveform_extents(
    sample_count: u64,
    sample_rate: f64,
) -> WaveformExtents {
    let qn = waveform_quantisation_number(sample_rate);
    if sample_count == 0 || qn <= 0 {
        return WaveformExtents::default();
    }

    let qn = qn as u64;
    let size = (sample_count + qn - 1) / qn;
    WaveformExtents {
        size,
        samples_per_entry: qn as f64,
    }
}

/// An overview waveform always has a fixed number of entries, so the
/// samples-per-entry is derived from the sample count after rounding it
/// down to the quantisation number.
pub fn calculate_overview_waveform_extents(
    sample_count: u64,
    sample_rate: f64,
) -> WaveformExtents {
    let qn = waveform_quantisation_number(sample_rate);
    if sample_count == 0 || qn <= 0 {
        return WaveformExtents::default();
    }

    let qn = qn as u64;
    let rounded_sample_count = (sample_count / qn) * qn;
    WaveformExtents {
        size: OVERVIEW_WAVEFORM_SIZE,
        samples_per_entry: rounded_sample_count as f64 / OVERVIEW_WAVEFORM_SIZE as f64,
    }
}
