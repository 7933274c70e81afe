//! Fixed-width integer and IEEE-754 primitives in both byte orders, plus
//! the zlib frame used by most performance-data blobs.
//!
//! Doubles travel through the 64-bit integer codec by bit
//! reinterpretation, so a NaN payload survives a round trip unchanged.

use std::io::{Read, Write};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::prelude::*;

#[inline]
pub fn get_u8<R: Read>(reader: &mut R) -> Result<u8> {
    Ok(reader.read_u8()?)
}

#[inline]
pub fn put_u8<W: Write>(writer: &mut W, value: u8) -> Result<()> {
    Ok(writer.write_u8(value)?)
}

#[inline]
pub fn get_i32_le<R: Read>(reader: &mut R) -> Result<i32> {
    Ok(reader.read_i32::<LittleEndian>()?)
}

#[inline]
pub fn put_i32_le<W: Write>(writer: &mut W, value: i32) -> Result<()> {
    Ok(writer.write_i32::<LittleEndian>(value)?)
}

#[inline]
pub fn get_i32_be<R: Read>(reader: &mut R) -> Result<i32> {
    Ok(reader.read_i32::<BigEndian>()?)
}

#[inline]
pub fn put_i32_be<W: Write>(writer: &mut W, value: i32) -> Result<()> {
    Ok(writer.write_i32::<BigEndian>(value)?)
}

#[inline]
pub fn get_i64_le<R: Read>(reader: &mut R) -> Result<i64> {
    Ok(reader.read_i64::<LittleEndian>()?)
}

#[inline]
pub fn put_i64_le<W: Write>(writer: &mut W, value: i64) -> Result<()> {
    Ok(writer.write_i64::<LittleEndian>(value)?)
}

#[inline]
pub fn get_i64_be<R: Read>(reader: &mut R) -> Result<i64> {
    Ok(reader.read_i64::<BigEndian>()?)
}

#[inline]
pub fn put_i64_be<W: Write>(writer: &mut W, value: i64) -> Result<()> {
    Ok(writer.write_i64::<BigEndian>(value)?)
}

#[inline]
pub fn get_f64_le<R: Read>(reader: &mut R) -> Result<f64> {
    Ok(f64::from_bits(get_i64_le(reader)? as u64))
}

#[inline]
pub fn put_f64_le<W: Write>(writer: &mut W, value: f64) -> Result<()> {
    put_i64_le(writer, value.to_bits() as i64)
}

#[inline]
pub fn get_f64_be<R: Read>(reader: &mut R) -> Result<f64> {
    Ok(f64::from_bits(get_i64_be(reader)? as u64))
}

#[inline]
pub fn put_f64_be<W: Write>(writer: &mut W, value: f64) -> Result<()> {
    put_i64_be(writer, value.to_bits() as i64)
}

/// Reads `len` bytes as a UTF-8 string.
pub fn take_string<R: Read>(reader: &mut R, len: usize) -> Result<String> {
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|_| CodecError::malformed("label is not valid UTF-8"))
}

/// Reads every remaining byte.
pub fn take_to_end<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Compresses a byte buffer, prefixing it with the uncompressed length as
/// a big-endian 32-bit integer. An empty input wraps to an empty output
/// with no length prefix.
pub fn zlib_wrap(uncompressed: &[u8]) -> Vec<u8> {
    if uncompressed.is_empty() {
        return Vec::new();
    }

    let mut compressed = Vec::with_capacity(uncompressed.len() / 2 + 16);
    compressed.extend_from_slice(&(uncompressed.len() as i32).to_be_bytes());

    let mut encoder = ZlibEncoder::new(compressed, Compression::default());
    encoder
        .write_all(uncompressed)
        .and_then(|_| encoder.finish())
        .expect("deflating into a memory buffer cannot fail")
}

/// Inflates a zlib frame produced by [`zlib_wrap`], asserting that the
/// inflated byte count matches the length prefix. An empty input decodes
/// to an empty output.
pub fn zlib_unwrap(compressed: &[u8]) -> Result<Vec<u8>> {
    if compressed.is_empty() {
        return Ok(Vec::new());
    }
    if compressed.len() < 4 {
        return Err(CodecError::TooShort);
    }

    let mut prefix = [0u8; 4];
    prefix.copy_from_slice(&compressed[..4]);
    let apparent_size = i32::from_be_bytes(prefix);
    if apparent_size == 0 {
        return Ok(Vec::new());
    }
    if apparent_size < 0 {
        return Err(CodecError::malformed(format!(
            "compressed frame declares a negative uncompressed length {apparent_size}"
        )));
    }

    let mut uncompressed = Vec::with_capacity(apparent_size as usize);
    ZlibDecoder::new(&compressed[4..])
        .read_to_end(&mut uncompressed)
        .map_err(|_| CodecError::InflateFailed)?;

    if uncompressed.len() != apparent_size as usize {
        return Err(CodecError::malformed(format!(
            "inflated length {} does not match the declared length {}",
            uncompressed.len(),
            apparent_size
        )));
    }

    Ok(uncompressed)
}
