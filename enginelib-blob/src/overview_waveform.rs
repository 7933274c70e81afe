//! The overview-waveform blob: a fixed-size, low-resolution waveform used
//! for whole-track displays.

use std::io::Cursor;

use crate::codec::*;
use crate::prelude::*;
use crate::waveform::{WaveformEntry, WaveformPoint};

/// The overview waveform for one track.
///
/// Only band values are stored on the wire; opacity is not persisted and
/// reads back as the fully-opaque sentinel 255. The per-band maxima that
/// close out the payload are recomputed from the entries on encode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverviewWaveformBlob {
    pub samples_per_entry: f64,
    pub waveform: Vec<WaveformEntry>,
    pub extra: Vec<u8>,
}

const MIN_SIZE: usize = 27;

impl OverviewWaveformBlob {
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(MIN_SIZE + 3 * self.waveform.len() + self.extra.len());
        put_i64_be(&mut buf, self.waveform.len() as i64)?;
        put_i64_be(&mut buf, self.waveform.len() as i64)?;
        put_f64_be(&mut buf, self.samples_per_entry)?;

        let mut max = WaveformEntry::default();
        for entry in &self.waveform {
            max.low.value = max.low.value.max(entry.low.value);
            max.mid.value = max.mid.value.max(entry.mid.value);
            max.high.value = max.high.value.max(entry.high.value);
            put_u8(&mut buf, entry.low.value)?;
            put_u8(&mut buf, entry.mid.value)?;
            put_u8(&mut buf, entry.high.value)?;
        }
        put_u8(&mut buf, max.low.value)?;
        put_u8(&mut buf, max.mid.value)?;
        put_u8(&mut buf, max.high.value)?;
        buf.extend_from_slice(&self.extra);
        Ok(zlib_wrap(&buf))
    }

    pub fn decode(blob: &[u8]) -> Result<Self> {
        let raw = zlib_unwrap(blob)?;
        if raw.len() < MIN_SIZE {
            return Err(CodecError::malformed(format!(
                "overview waveform data has less than the minimum length of {MIN_SIZE} bytes"
            )));
        }

        let mut reader = Cursor::new(raw.as_slice());
        let num_entries_1 = get_i64_be(&mut reader)?;
        let num_entries_2 = get_i64_be(&mut reader)?;
        if num_entries_1 != num_entries_2 {
            return Err(CodecError::malformed(
                "overview waveform data has conflicting length fields",
            ));
        }
        let samples_per_entry = get_f64_be(&mut reader)?;

        let remaining = raw.len() - reader.position() as usize;
        if num_entries_1 < 0 || remaining < 3 * (num_entries_1 as usize + 1) {
            return Err(CodecError::malformed(
                "overview waveform data has incorrect length",
            ));
        }

        let mut waveform = Vec::with_capacity(num_entries_1 as usize);
        for _ in 0..num_entries_1 {
            waveform.push(WaveformEntry {
                low: WaveformPoint::new(get_u8(&mut reader)?, 255),
                mid: WaveformPoint::new(get_u8(&mut reader)?, 255),
                high: WaveformPoint::new(get_u8(&mut reader)?, 255),
            });
        }

        // Per-band maxima; recomputed on encode.
        for _ in 0..3 {
            get_u8(&mut reader)?;
        }
        let extra = take_to_end(&mut reader)?;

        Ok(OverviewWaveformBlob {
            samples_per_entry,
            waveform,
            extra,
        })
    }
}
