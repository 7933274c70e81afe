//! The beat-data blob: two beat grids (default and adjusted) anchored to
//! absolute sample positions.

use std::io::Cursor;

use crate::codec::*;
use crate::prelude::*;

/// Largest marker count accepted on decode.
pub const MAX_BEATGRID_MARKERS: i64 = 32768;

/// One beat-grid marker on the wire.
///
/// The beats-to-next-marker field is not stored here: it is recomputed on
/// encode from consecutive beat indices and validated on decode. The final
/// 32-bit field of each marker has no known meaning; it is preserved so
/// that a decode/encode cycle reproduces observed data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatGridMarkerBlob {
    pub sample_offset: f64,
    pub beat_index: i64,
    pub unknown: i32,
}

impl BeatGridMarkerBlob {
    pub fn new(beat_index: i64, sample_offset: f64) -> Self {
        BeatGridMarkerBlob {
            sample_offset,
            beat_index,
            unknown: 0,
        }
    }
}

/// Beat grids for one track.
///
/// Observed files carry up to 9 trailing zero bytes after the grids; they
/// are tolerated on decode and re-emitted verbatim on encode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeatDataBlob {
    pub sample_rate: f64,
    pub sample_count: f64,
    pub is_beatgrid_set: bool,
    pub default_beatgrid: Vec<BeatGridMarkerBlob>,
    pub adjusted_beatgrid: Vec<BeatGridMarkerBlob>,
    pub extra: Vec<u8>,
}

const MIN_SIZE: usize = 33;
const MARKER_SIZE: usize = 24;

fn encode_beatgrid(buf: &mut Vec<u8>, beatgrid: &[BeatGridMarkerBlob]) -> Result<()> {
    put_i64_be(buf, beatgrid.len() as i64)?;
    for (i, marker) in beatgrid.iter().enumerate() {
        put_f64_le(buf, marker.sample_offset)?;
        put_i64_le(buf, marker.beat_index)?;
        let beats_until_next_marker = match beatgrid.get(i + 1) {
            Some(next) => (next.beat_index - marker.beat_index) as i32,
            None => 0,
        };
        put_i32_le(buf, beats_until_next_marker)?;
        put_i32_le(buf, marker.unknown)?;
    }
    Ok(())
}

fn decode_beatgrid(
    reader: &mut Cursor<&[u8]>,
    total_len: usize,
) -> Result<Vec<BeatGridMarkerBlob>> {
    let count = get_i64_be(reader)?;
    if count == 0 {
        return Ok(Vec::new());
    }
    if count < 2 {
        return Err(CodecError::malformed(
            "beat grid has an invalid number of markers",
        ));
    }
    if count > MAX_BEATGRID_MARKERS {
        return Err(CodecError::malformed("beat grid has too many markers"));
    }
    let remaining = total_len - reader.position() as usize;
    if remaining < MARKER_SIZE * count as usize {
        return Err(CodecError::malformed("beat grid is missing data"));
    }

    let mut result: Vec<BeatGridMarkerBlob> = Vec::with_capacity(count as usize);
    let mut beats_until_next_marker = 0i32;
    for i in 0..count {
        let sample_offset = get_f64_le(reader)?;
        let beat_index = get_i64_le(reader)?;
        if let Some(prev) = result.last() {
            if beat_index <= prev.beat_index {
                return Err(CodecError::malformed("beat grid has unsorted indices"));
            }
            if sample_offset <= prev.sample_offset {
                return Err(CodecError::malformed(
                    "beat grid has unsorted sample offsets",
                ));
            }
            if beat_index - prev.beat_index != beats_until_next_marker as i64 {
                return Err(CodecError::malformed("beat grid has conflicting markers"));
            }
        }
        beats_until_next_marker = get_i32_le(reader)?;
        let unknown = get_i32_le(reader)?;
        result.push(BeatGridMarkerBlob {
            sample_offset,
            beat_index,
            unknown,
        });
        if i == count - 1 && beats_until_next_marker != 0 {
            return Err(CodecError::malformed(
                "beat grid promises a marker beyond the last one",
            ));
        }
    }

    Ok(result)
}

impl BeatDataBlob {
    pub fn encode(&self) -> Result<Vec<u8>> {
        let marker_count = self.default_beatgrid.len() + self.adjusted_beatgrid.len();
        let mut buf = Vec::with_capacity(MIN_SIZE + MARKER_SIZE * marker_count + self.extra.len());
        put_f64_be(&mut buf, self.sample_rate)?;
        put_f64_be(&mut buf, self.sample_count)?;
        put_u8(&mut buf, self.is_beatgrid_set as u8)?;
        encode_beatgrid(&mut buf, &self.default_beatgrid)?;
        encode_beatgrid(&mut buf, &self.adjusted_beatgrid)?;
        buf.extend_from_slice(&self.extra);
        Ok(zlib_wrap(&buf))
    }

    pub fn decode(blob: &[u8]) -> Result<Self> {
        let raw = zlib_unwrap(blob)?;
        if raw.len() < MIN_SIZE {
            return Err(CodecError::malformed(format!(
                "beat data has less than the minimum length of {MIN_SIZE} bytes"
            )));
        }

        let mut reader = Cursor::new(raw.as_slice());
        let sample_rate = get_f64_be(&mut reader)?;
        let sample_count = get_f64_be(&mut reader)?;
        let is_beatgrid_set_flag = get_u8(&mut reader)?;
        if is_beatgrid_set_flag > 1 {
            log::warn!("beat data carries unexpected beatgrid-set flag {is_beatgrid_set_flag}");
        }
        let is_beatgrid_set = is_beatgrid_set_flag != 0;
        let default_beatgrid = decode_beatgrid(&mut reader, raw.len())?;
        let adjusted_beatgrid = decode_beatgrid(&mut reader, raw.len())?;

        let extra = take_to_end(&mut reader)?;
        if extra.iter().any(|&b| b != 0) {
            return Err(CodecError::malformed("beat data has trailing non-zero data"));
        }

        Ok(BeatDataBlob {
            sample_rate,
            sample_count,
            is_beatgrid_set,
            default_beatgrid,
            adjusted_beatgrid,
            extra,
        })
    }
}
