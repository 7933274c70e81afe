use enginelib_blob::codec::{zlib_unwrap, zlib_wrap};
use enginelib_blob::{BeatDataBlob, BeatGridMarkerBlob, CodecError};

mod common;

#[test]
fn two_marker_grid_re_encodes_byte_identically() {
    let blob = BeatDataBlob {
        sample_rate: 44100.0,
        sample_count: 1_500_000.0,
        is_beatgrid_set: true,
        default_beatgrid: vec![
            BeatGridMarkerBlob::new(-4, 0.0),
            BeatGridMarkerBlob::new(404, 1_000_000.0),
        ],
        adjusted_beatgrid: vec![
            BeatGridMarkerBlob::new(-4, 0.0),
            BeatGridMarkerBlob::new(404, 1_000_000.0),
        ],
        extra: Vec::new(),
    };

    let encoded = blob.encode().unwrap();
    let decoded = BeatDataBlob::decode(&encoded).unwrap();
    assert_eq!(decoded, blob);
    assert_eq!(decoded.encode().unwrap(), encoded);
}

#[test]
fn empty_grids_round_trip() {
    let blob = BeatDataBlob {
        sample_rate: 0.0,
        sample_count: 0.0,
        is_beatgrid_set: true,
        default_beatgrid: Vec::new(),
        adjusted_beatgrid: Vec::new(),
        extra: Vec::new(),
    };
    let decoded = BeatDataBlob::decode(&blob.encode().unwrap()).unwrap();
    assert_eq!(decoded, blob);
}

fn raw_grid_bytes(markers: &[(f64, i64, i32, i32)]) -> Vec<u8> {
    let mut raw = Vec::new();
    raw.extend_from_slice(&44100.0f64.to_bits().to_be_bytes());
    raw.extend_from_slice(&1_000_000.0f64.to_bits().to_be_bytes());
    raw.push(1);
    for _ in 0..2 {
        raw.extend_from_slice(&(markers.len() as i64).to_be_bytes());
        for &(offset, index, beats, unknown) in markers {
            raw.extend_from_slice(&offset.to_bits().to_le_bytes());
            raw.extend_from_slice(&index.to_le_bytes());
            raw.extend_from_slice(&beats.to_le_bytes());
            raw.extend_from_slice(&unknown.to_le_bytes());
        }
    }
    raw
}

#[test]
fn rejects_a_single_marker() {
    let raw = raw_grid_bytes(&[(0.0, -4, 0, 0)]);
    assert!(matches!(
        BeatDataBlob::decode(&zlib_wrap(&raw)),
        Err(CodecError::Malformed { .. })
    ));
}

#[test]
fn rejects_unsorted_indices() {
    let raw = raw_grid_bytes(&[(0.0, 10, -6, 0), (500.0, 4, 0, 0)]);
    assert!(matches!(
        BeatDataBlob::decode(&zlib_wrap(&raw)),
        Err(CodecError::Malformed { .. })
    ));
}

#[test]
fn rejects_unsorted_sample_offsets() {
    let raw = raw_grid_bytes(&[(500.0, -4, 8, 0), (100.0, 4, 0, 0)]);
    assert!(matches!(
        BeatDataBlob::decode(&zlib_wrap(&raw)),
        Err(CodecError::Malformed { .. })
    ));
}

#[test]
fn rejects_inconsistent_beat_spans() {
    // The first marker promises 7 beats to the next, but the indices are
    // 8 apart.
    let raw = raw_grid_bytes(&[(0.0, -4, 7, 0), (500.0, 4, 0, 0)]);
    assert!(matches!(
        BeatDataBlob::decode(&zlib_wrap(&raw)),
        Err(CodecError::Malformed { .. })
    ));
}

#[test]
fn rejects_nonzero_final_beat_span() {
    let raw = raw_grid_bytes(&[(0.0, -4, 8, 0), (500.0, 4, 8, 0)]);
    assert!(matches!(
        BeatDataBlob::decode(&zlib_wrap(&raw)),
        Err(CodecError::Malformed { .. })
    ));
}

#[test]
fn trailing_zero_bytes_are_preserved() {
    let mut raw = raw_grid_bytes(&[(0.0, -4, 8, 0), (500.0, 4, 0, 0)]);
    raw.extend_from_slice(&[0u8; 9]);
    let wrapped = zlib_wrap(&raw);

    let decoded = BeatDataBlob::decode(&wrapped).unwrap();
    assert_eq!(decoded.extra, vec![0u8; 9]);

    let re_encoded = decoded.encode().unwrap();
    assert_eq!(zlib_unwrap(&re_encoded).unwrap(), raw);
}

#[test]
fn rejects_trailing_nonzero_bytes() {
    let mut raw = raw_grid_bytes(&[(0.0, -4, 8, 0), (500.0, 4, 0, 0)]);
    raw.extend_from_slice(&[0, 0, 7]);
    assert!(matches!(
        BeatDataBlob::decode(&zlib_wrap(&raw)),
        Err(CodecError::Malformed { .. })
    ));
}

#[test]
fn unknown_marker_field_is_preserved() {
    let raw = raw_grid_bytes(&[(0.0, -4, 8, 42), (500.0, 4, 0, 99)]);
    let decoded = BeatDataBlob::decode(&zlib_wrap(&raw)).unwrap();
    assert_eq!(decoded.default_beatgrid[0].unknown, 42);
    assert_eq!(decoded.default_beatgrid[1].unknown, 99);
    assert_eq!(zlib_unwrap(&decoded.encode().unwrap()).unwrap(), raw);
}
