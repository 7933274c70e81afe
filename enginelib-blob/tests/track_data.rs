use enginelib_blob::codec::{zlib_unwrap, zlib_wrap};
use enginelib_blob::TrackDataBlob;

#[test]
fn single_band_layout() {
    let blob = TrackDataBlob::new(44100.0, 17_452_800, 0.5, 1);
    let raw = zlib_unwrap(&blob.encode_single_band().unwrap()).unwrap();
    assert_eq!(raw.len(), TrackDataBlob::SINGLE_BAND_SIZE);

    let mut expected = Vec::new();
    expected.extend_from_slice(&44100.0f64.to_bits().to_be_bytes());
    expected.extend_from_slice(&17_452_800i64.to_be_bytes());
    expected.extend_from_slice(&0.5f64.to_bits().to_be_bytes());
    expected.extend_from_slice(&1i32.to_be_bytes());
    assert_eq!(raw, expected);

    let decoded = TrackDataBlob::decode_single_band(&blob.encode_single_band().unwrap()).unwrap();
    assert_eq!(decoded, blob);
}

#[test]
fn three_band_layout() {
    let blob = TrackDataBlob::new(48000.0, 1_000_000, 0.25, 13);
    let raw = zlib_unwrap(&blob.encode_three_band().unwrap()).unwrap();
    assert_eq!(raw.len(), TrackDataBlob::THREE_BAND_SIZE);

    let mut expected = Vec::new();
    expected.extend_from_slice(&48000.0f64.to_bits().to_be_bytes());
    expected.extend_from_slice(&1_000_000i64.to_be_bytes());
    expected.extend_from_slice(&13i32.to_be_bytes());
    for _ in 0..3 {
        expected.extend_from_slice(&0.25f64.to_bits().to_be_bytes());
    }
    assert_eq!(raw, expected);

    let decoded = TrackDataBlob::decode_three_band(&blob.encode_three_band().unwrap()).unwrap();
    assert_eq!(decoded, blob);
}

#[test]
fn absent_fields_use_zero_sentinels() {
    let blob = TrackDataBlob::default();
    let decoded = TrackDataBlob::decode_single_band(&blob.encode_single_band().unwrap()).unwrap();
    assert_eq!(decoded.average_loudness_low, 0.0);
    assert_eq!(decoded.key, 0);
}

#[test]
fn trailing_bytes_are_preserved() {
    let mut raw = Vec::new();
    raw.extend_from_slice(&44100.0f64.to_bits().to_be_bytes());
    raw.extend_from_slice(&17_452_800i64.to_be_bytes());
    raw.extend_from_slice(&0.5f64.to_bits().to_be_bytes());
    raw.extend_from_slice(&1i32.to_be_bytes());
    raw.extend_from_slice(&[9, 8, 7]);

    let decoded = TrackDataBlob::decode_single_band(&zlib_wrap(&raw)).unwrap();
    assert_eq!(decoded.extra, vec![9, 8, 7]);
    assert_eq!(
        zlib_unwrap(&decoded.encode_single_band().unwrap()).unwrap(),
        raw
    );
}
