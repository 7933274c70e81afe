//! The track-summary blob: sampling information, average loudness and the
//! detected musical key.

use std::io::Cursor;

use crate::codec::*;
use crate::prelude::*;

/// Summary analysis results for one track.
///
/// Two dialects of this blob exist. The single-band dialect has a 28-byte
/// payload carrying one average-loudness figure. The three-band dialect
/// has a 44-byte payload carrying separate low/mid/high loudness figures;
/// the reference software always writes the three bands equal. A zero
/// loudness or key is the absent sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackDataBlob {
    pub sample_rate: f64,
    pub sample_count: i64,
    pub average_loudness_low: f64,
    pub average_loudness_mid: f64,
    pub average_loudness_high: f64,
    pub key: i32,
    /// Trailing bytes after the fixed payload, preserved verbatim.
    pub extra: Vec<u8>,
}

impl TrackDataBlob {
    pub const SINGLE_BAND_SIZE: usize = 28;
    pub const THREE_BAND_SIZE: usize = 44;

    /// Builds a blob with all three loudness bands set to the same value.
    pub fn new(sample_rate: f64, sample_count: i64, average_loudness: f64, key: i32) -> Self {
        TrackDataBlob {
            sample_rate,
            sample_count,
            average_loudness_low: average_loudness,
            average_loudness_mid: average_loudness,
            average_loudness_high: average_loudness,
            key,
            extra: Vec::new(),
        }
    }

    pub fn encode_single_band(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(Self::SINGLE_BAND_SIZE + self.extra.len());
        put_f64_be(&mut buf, self.sample_rate)?;
        put_i64_be(&mut buf, self.sample_count)?;
        put_f64_be(&mut buf, self.average_loudness_low)?;
        put_i32_be(&mut buf, self.key)?;
        buf.extend_from_slice(&self.extra);
        Ok(zlib_wrap(&buf))
    }

    pub fn decode_single_band(blob: &[u8]) -> Result<Self> {
        let raw = zlib_unwrap(blob)?;
        if raw.len() < Self::SINGLE_BAND_SIZE {
            return Err(CodecError::malformed(format!(
                "track data has less than the minimum length of {} bytes",
                Self::SINGLE_BAND_SIZE
            )));
        }

        let mut reader = Cursor::new(raw.as_slice());
        let sample_rate = get_f64_be(&mut reader)?;
        let sample_count = get_i64_be(&mut reader)?;
        let average_loudness = get_f64_be(&mut reader)?;
        let key = get_i32_be(&mut reader)?;
        let extra = take_to_end(&mut reader)?;

        Ok(TrackDataBlob {
            sample_rate,
            sample_count,
            average_loudness_low: average_loudness,
            average_loudness_mid: average_loudness,
            average_loudness_high: average_loudness,
            key,
            extra,
        })
    }

    pub fn encode_three_band(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(Self::THREE_BAND_SIZE + self.extra.len());
        put_f64_be(&mut buf, self.sample_rate)?;
        put_i64_be(&mut buf, self.sample_count)?;
        put_i32_be(&mut buf, self.key)?;
        put_f64_be(&mut buf, self.average_loudness_low)?;
        put_f64_be(&mut buf, self.average_loudness_mid)?;
        put_f64_be(&mut buf, self.average_loudness_high)?;
        buf.extend_from_slice(&self.extra);
        Ok(zlib_wrap(&buf))
    }

    pub fn decode_three_band(blob: &[u8]) -> Result<Self> {
        let raw = zlib_unwrap(blob)?;
        if raw.len() < Self::THREE_BAND_SIZE {
            return Err(CodecError::malformed(format!(
                "track data has less than the minimum length of {} bytes",
                Self::THREE_BAND_SIZE
            )));
        }

        let mut reader = Cursor::new(raw.as_slice());
        let sample_rate = get_f64_be(&mut reader)?;
        let sample_count = get_i64_be(&mut reader)?;
        let key = get_i32_be(&mut reader)?;
        let average_loudness_low = get_f64_be(&mut reader)?;
        let average_loudness_mid = get_f64_be(&mut reader)?;
        let average_loudness_high = get_f64_be(&mut reader)?;
        let extra = take_to_end(&mut reader)?;

        Ok(TrackDataBlob {
            sample_rate,
            sample_count,
            average_loudness_low,
            average_loudness_mid,
            average_loudness_high,
            key,
            extra,
        })
    }
}
