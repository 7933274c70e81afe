//! The loops blob: eight saved-loop slots. Unlike every other
//! performance-data blob, loops are stored uncompressed.

use std::io::Cursor;

use crate::codec::*;
use crate::color::Color;
use crate::prelude::*;

/// Number of loop slots written for every track.
pub const MAX_LOOPS: usize = 8;

const LOOP_SAMPLE_OFFSET_EMPTY: f64 = -1.0;

/// A populated loop slot.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopBlob {
    pub label: String,
    pub start_sample_offset: f64,
    pub end_sample_offset: f64,
    pub color: Color,
}

/// All saved loops for one track. A slot is set only when both endpoint
/// flags on the wire are set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopsBlob {
    pub loops: Vec<Option<LoopBlob>>,
}

const MIN_SIZE: usize = 8;

impl LoopsBlob {
    pub fn encode(&self) -> Result<Vec<u8>> {
        let total_label_length: usize =
            self.loops.iter().flatten().map(|l| l.label.len()).sum();
        let mut buf = Vec::with_capacity(MIN_SIZE + 23 * self.loops.len() + total_label_length);

        put_i64_le(&mut buf, self.loops.len() as i64)?;
        for slot in &self.loops {
            match slot {
                Some(l) => {
                    if l.label.is_empty() {
                        return Err(CodecError::malformed("loop labels must not be empty"));
                    }
                    if l.label.len() > u8::MAX as usize {
                        return Err(CodecError::malformed("loop label is too long"));
                    }
                    put_u8(&mut buf, l.label.len() as u8)?;
                    buf.extend_from_slice(l.label.as_bytes());
                    put_f64_le(&mut buf, l.start_sample_offset)?;
                    put_f64_le(&mut buf, l.end_sample_offset)?;
                    put_u8(&mut buf, 1)?;
                    put_u8(&mut buf, 1)?;
                    put_u8(&mut buf, l.color.a)?;
                    put_u8(&mut buf, l.color.r)?;
                    put_u8(&mut buf, l.color.g)?;
                    put_u8(&mut buf, l.color.b)?;
                }
                None => {
                    put_u8(&mut buf, 0)?;
                    put_f64_le(&mut buf, LOOP_SAMPLE_OFFSET_EMPTY)?;
                    put_f64_le(&mut buf, LOOP_SAMPLE_OFFSET_EMPTY)?;
                    for _ in 0..6 {
                        put_u8(&mut buf, 0)?;
                    }
                }
            }
        }

        Ok(buf)
    }

    pub fn decode(blob: &[u8]) -> Result<Self> {
        if blob.len() < MIN_SIZE {
            return Err(CodecError::malformed(format!(
                "loops data has less than the minimum length of {MIN_SIZE} bytes"
            )));
        }

        let mut reader = Cursor::new(blob);
        let num_loops = get_i64_le(&mut reader)?;
        if !(0..=i64::from(u8::MAX)).contains(&num_loops) {
            return Err(CodecError::malformed("loops data has an invalid loop count"));
        }

        let mut loops = Vec::with_capacity(num_loops as usize);
        for _ in 0..num_loops {
            let label_length = get_u8(&mut reader)? as usize;
            let remaining = blob.len() - reader.position() as usize;
            if remaining < 22 + label_length {
                return Err(CodecError::malformed("loops data has a loop with missing data"));
            }

            let label = take_string(&mut reader, label_length)?;
            let start_sample_offset = get_f64_le(&mut reader)?;
            let end_sample_offset = get_f64_le(&mut reader)?;
            let is_start_set = get_u8(&mut reader)?;
            let is_end_set = get_u8(&mut reader)?;
            let color = Color {
                a: get_u8(&mut reader)?,
                r: get_u8(&mut reader)?,
                g: get_u8(&mut reader)?,
                b: get_u8(&mut reader)?,
            };

            if is_start_set == 1 && is_end_set == 1 {
                loops.push(Some(LoopBlob {
                    label,
                    start_sample_offset,
                    end_sample_offset,
                    color,
                }));
            } else {
                loops.push(None);
            }
        }

        if reader.position() as usize != blob.len() {
            return Err(CodecError::malformed("loops data has too much data"));
        }

        Ok(LoopsBlob { loops })
    }
}
