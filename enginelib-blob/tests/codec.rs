use std::io::Cursor;

use enginelib_blob::codec::*;
use enginelib_blob::CodecError;

#[test]
fn integer_primitives_round_trip() {
    let mut buf = Vec::new();
    put_u8(&mut buf, 0xAB).unwrap();
    put_i32_le(&mut buf, -123_456).unwrap();
    put_i32_be(&mut buf, 123_456).unwrap();
    put_i64_le(&mut buf, -1_234_567_890_123).unwrap();
    put_i64_be(&mut buf, 1_234_567_890_123).unwrap();

    let mut reader = Cursor::new(buf.as_slice());
    assert_eq!(get_u8(&mut reader).unwrap(), 0xAB);
    assert_eq!(get_i32_le(&mut reader).unwrap(), -123_456);
    assert_eq!(get_i32_be(&mut reader).unwrap(), 123_456);
    assert_eq!(get_i64_le(&mut reader).unwrap(), -1_234_567_890_123);
    assert_eq!(get_i64_be(&mut reader).unwrap(), 1_234_567_890_123);
}

#[test]
fn doubles_travel_through_the_integer_codec() {
    let mut buf = Vec::new();
    put_f64_be(&mut buf, 44100.0).unwrap();
    assert_eq!(buf, 44100.0f64.to_bits().to_be_bytes());

    let mut buf = Vec::new();
    put_f64_le(&mut buf, -83316.78).unwrap();
    let mut reader = Cursor::new(buf.as_slice());
    assert_eq!(get_f64_le(&mut reader).unwrap(), -83316.78);
}

#[test]
fn byte_order_is_not_mixed_up() {
    let mut buf = Vec::new();
    put_i32_be(&mut buf, 0x0102_0304).unwrap();
    assert_eq!(buf, [1, 2, 3, 4]);

    let mut buf = Vec::new();
    put_i32_le(&mut buf, 0x0102_0304).unwrap();
    assert_eq!(buf, [4, 3, 2, 1]);
}

#[test]
fn truncated_reads_report_too_short() {
    let mut reader = Cursor::new(&[0u8, 1][..]);
    assert!(matches!(
        get_i64_be(&mut reader),
        Err(CodecError::TooShort)
    ));
}

#[test]
fn zlib_round_trip() {
    let payload: Vec<u8> = (0..=255).cycle().take(4096).collect();
    let wrapped = zlib_wrap(&payload);
    assert_eq!(&wrapped[..4], &(payload.len() as i32).to_be_bytes());
    assert_eq!(zlib_unwrap(&wrapped).unwrap(), payload);
}

#[test]
fn zlib_empty_input_maps_to_empty_output() {
    assert!(zlib_wrap(&[]).is_empty());
    assert!(zlib_unwrap(&[]).unwrap().is_empty());
}

#[test]
fn zlib_unwrap_rejects_short_input() {
    assert!(matches!(zlib_unwrap(&[1, 2, 3]), Err(CodecError::TooShort)));
}

#[test]
fn zlib_unwrap_rejects_length_mismatch() {
    let mut wrapped = zlib_wrap(b"four byte payloads deserve honesty");
    // Corrupt the length prefix.
    wrapped[3] = wrapped[3].wrapping_add(1);
    assert!(matches!(
        zlib_unwrap(&wrapped),
        Err(CodecError::Malformed { .. })
    ));
}

#[test]
fn zlib_unwrap_rejects_garbage_payload() {
    let mut bad = vec![0, 0, 0, 8];
    bad.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    assert!(matches!(
        zlib_unwrap(&bad),
        Err(CodecError::InflateFailed)
    ));
}
