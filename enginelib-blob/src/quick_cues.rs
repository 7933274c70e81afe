//! The quick-cues blob: eight hot-cue slots plus the default and adjusted
//! main cue points.

use std::io::Cursor;

use crate::codec::*;
use crate::color::Color;
use crate::prelude::*;

/// Number of hot-cue slots written for every track.
pub const MAX_HOT_CUES: usize = 8;

/// Sample offset marking an empty hot-cue slot.
pub const QUICK_CUE_SAMPLE_OFFSET_EMPTY: f64 = -1.0;

/// A populated hot-cue slot.
#[derive(Debug, Clone, PartialEq)]
pub struct HotCueBlob {
    pub label: String,
    pub sample_offset: f64,
    pub color: Color,
}

/// All cue information for one track.
///
/// The wire format carries an is-main-cue-adjusted flag after the adjusted
/// main cue; it is derived on encode from the two cue fields, and decode
/// rejects a cleared flag paired with differing cues.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuickCuesBlob {
    pub hot_cues: Vec<Option<HotCueBlob>>,
    pub adjusted_main_cue: f64,
    pub default_main_cue: f64,
    pub extra: Vec<u8>,
}

const MIN_SIZE: usize = 25;

impl QuickCuesBlob {
    pub fn encode(&self) -> Result<Vec<u8>> {
        let total_label_length: usize = self
            .hot_cues
            .iter()
            .flatten()
            .map(|cue| cue.label.len())
            .sum();
        let mut buf =
            Vec::with_capacity(MIN_SIZE + 13 * self.hot_cues.len() + total_label_length);

        put_i64_be(&mut buf, self.hot_cues.len() as i64)?;
        for slot in &self.hot_cues {
            match slot {
                Some(cue) => {
                    if cue.label.is_empty() {
                        return Err(CodecError::malformed("hot cue labels must not be empty"));
                    }
                    if cue.label.len() > u8::MAX as usize {
                        return Err(CodecError::malformed("hot cue label is too long"));
                    }
                    put_u8(&mut buf, cue.label.len() as u8)?;
                    buf.extend_from_slice(cue.label.as_bytes());
                    put_f64_be(&mut buf, cue.sample_offset)?;
                    put_u8(&mut buf, cue.color.a)?;
                    put_u8(&mut buf, cue.color.r)?;
                    put_u8(&mut buf, cue.color.g)?;
                    put_u8(&mut buf, cue.color.b)?;
                }
                None => {
                    put_u8(&mut buf, 0)?;
                    put_f64_be(&mut buf, QUICK_CUE_SAMPLE_OFFSET_EMPTY)?;
                    for _ in 0..4 {
                        put_u8(&mut buf, 0)?;
                    }
                }
            }
        }

        put_f64_be(&mut buf, self.adjusted_main_cue)?;
        let is_main_cue_adjusted = self.adjusted_main_cue != self.default_main_cue;
        put_u8(&mut buf, is_main_cue_adjusted as u8)?;
        put_f64_be(&mut buf, self.default_main_cue)?;
        buf.extend_from_slice(&self.extra);
        Ok(zlib_wrap(&buf))
    }

    pub fn decode(blob: &[u8]) -> Result<Self> {
        let raw = zlib_unwrap(blob)?;
        if raw.len() < MIN_SIZE {
            return Err(CodecError::malformed(format!(
                "quick cues data has less than the minimum length of {MIN_SIZE} bytes"
            )));
        }

        let mut reader = Cursor::new(raw.as_slice());
        let num_hot_cues = get_i64_be(&mut reader)?;
        if !(0..=i64::from(u8::MAX)).contains(&num_hot_cues) {
            return Err(CodecError::malformed(
                "quick cues data has an invalid hot cue count",
            ));
        }

        let mut hot_cues = Vec::with_capacity(num_hot_cues as usize);
        for _ in 0..num_hot_cues {
            let label_length = get_u8(&mut reader)? as usize;
            // 12 bytes follow each label, and 17 close out the blob.
            let remaining = raw.len() - reader.position() as usize;
            if remaining < 29 + label_length {
                return Err(CodecError::malformed(
                    "quick cues data has a hot cue with missing data",
                ));
            }

            let label = take_string(&mut reader, label_length)?;
            let sample_offset = get_f64_be(&mut reader)?;
            let color = Color {
                a: get_u8(&mut reader)?,
                r: get_u8(&mut reader)?,
                g: get_u8(&mut reader)?,
                b: get_u8(&mut reader)?,
            };

            if sample_offset == QUICK_CUE_SAMPLE_OFFSET_EMPTY {
                hot_cues.push(None);
            } else {
                hot_cues.push(Some(HotCueBlob {
                    label,
                    sample_offset,
                    color,
                }));
            }
        }

        let adjusted_main_cue = get_f64_be(&mut reader)?;
        let is_main_cue_adjusted = get_u8(&mut reader)?;
        let default_main_cue = get_f64_be(&mut reader)?;
        if is_main_cue_adjusted > 1
            || (is_main_cue_adjusted == 0 && adjusted_main_cue != default_main_cue)
        {
            return Err(CodecError::malformed(
                "quick cues data has invalid main cue data",
            ));
        }

        let extra = take_to_end(&mut reader)?;

        Ok(QuickCuesBlob {
            hot_cues,
            adjusted_main_cue,
            default_main_cue,
            extra,
        })
    }
}
