//! The high-resolution waveform blob, with an entry count that scales
//! with track duration at roughly 105 entries per second.

use std::io::Cursor;

use crate::codec::*;
use crate::prelude::*;
use crate::waveform::{WaveformEntry, WaveformPoint};

/// The high-resolution waveform for one track. Both value and opacity are
/// persisted per band; the closing per-band maxima are recomputed from the
/// entries on encode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighResWaveformBlob {
    pub samples_per_entry: f64,
    pub waveform: Vec<WaveformEntry>,
    pub extra: Vec<u8>,
}

const MIN_SIZE: usize = 30;

impl HighResWaveformBlob {
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(MIN_SIZE + 6 * self.waveform.len() + self.extra.len());
        put_i64_be(&mut buf, self.waveform.len() as i64)?;
        put_i64_be(&mut buf, self.waveform.len() as i64)?;
        put_f64_be(&mut buf, self.samples_per_entry)?;

        let mut max = WaveformEntry::default();
        for entry in &self.waveform {
            max.low.value = max.low.value.max(entry.low.value);
            max.mid.value = max.mid.value.max(entry.mid.value);
            max.high.value = max.high.value.max(entry.high.value);
            max.low.opacity = max.low.opacity.max(entry.low.opacity);
            max.mid.opacity = max.mid.opacity.max(entry.mid.opacity);
            max.high.opacity = max.high.opacity.max(entry.high.opacity);
            put_u8(&mut buf, entry.low.value)?;
            put_u8(&mut buf, entry.mid.value)?;
            put_u8(&mut buf, entry.high.value)?;
            put_u8(&mut buf, entry.low.opacity)?;
            put_u8(&mut buf, entry.mid.opacity)?;
            put_u8(&mut buf, entry.high.opacity)?;
        }
        put_u8(&mut buf, max.low.value)?;
        put_u8(&mut buf, max.mid.value)?;
        put_u8(&mut buf, max.high.value)?;
        put_u8(&mut buf, max.low.opacity)?;
        put_u8(&mut buf, max.mid.opacity)?;
        put_u8(&mut buf, max.high.opacity)?;
        buf.extend_from_slice(&self.extra);
        Ok(zlib_wrap(&buf))
    }

    pub fn decode(blob: &[u8]) -> Result<Self> {
        let raw = zlib_unwrap(blob)?;
        if raw.len() < MIN_SIZE {
            return Err(CodecError::malformed(format!(
                "high-resolution waveform data has less than the minimum length of {MIN_SIZE} bytes"
            )));
        }

        let mut reader = Cursor::new(raw.as_slice());
        let num_entries_1 = get_i64_be(&mut reader)?;
        let num_entries_2 = get_i64_be(&mut reader)?;
        if num_entries_1 != num_entries_2 {
            return Err(CodecError::malformed(
                "high-resolution waveform data has conflicting length fields",
            ));
        }
        let samples_per_entry = get_f64_be(&mut reader)?;

        let remaining = raw.len() - reader.position() as usize;
        if num_entries_1 < 0 || remaining < 6 * (num_entries_1 as usize + 1) {
            return Err(CodecError::malformed(
                "high-resolution waveform data has incorrect length",
            ));
        }

        let mut waveform = Vec::with_capacity(num_entries_1 as usize);
        for _ in 0..num_entries_1 {
            let low_value = get_u8(&mut reader)?;
            let mid_value = get_u8(&mut reader)?;
            let high_value = get_u8(&mut reader)?;
            let low_opacity = get_u8(&mut reader)?;
            let mid_opacity = get_u8(&mut reader)?;
            let high_opacity = get_u8(&mut reader)?;
            waveform.push(WaveformEntry {
                low: WaveformPoint::new(low_value, low_opacity),
                mid: WaveformPoint::new(mid_value, mid_opacity),
                high: WaveformPoint::new(high_value, high_opacity),
            });
        }

        // Per-band maxima; recomputed on encode.
        for _ in 0..6 {
            get_u8(&mut reader)?;
        }
        let extra = take_to_end(&mut reader)?;

        Ok(HighResWaveformBlob {
            samples_per_entry,
            waveform,
            extra,
        })
    }
}
