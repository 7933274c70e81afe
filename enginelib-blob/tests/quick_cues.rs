use enginelib_blob::codec::zlib_unwrap;
use enginelib_blob::{CodecError, HotCueBlob, QuickCuesBlob};

mod common;

#[test]
fn cues_round_trip() {
    let blob = common::sample_quick_cues();
    let decoded = QuickCuesBlob::decode(&blob.encode().unwrap()).unwrap();
    assert_eq!(decoded, blob);
}

#[test]
fn empty_slot_wire_layout() {
    let blob = QuickCuesBlob {
        hot_cues: vec![None],
        adjusted_main_cue: 0.0,
        default_main_cue: 0.0,
        extra: Vec::new(),
    };
    let raw = zlib_unwrap(&blob.encode().unwrap()).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&1i64.to_be_bytes());
    expected.push(0); // label length
    expected.extend_from_slice(&(-1.0f64).to_bits().to_be_bytes());
    expected.extend_from_slice(&[0, 0, 0, 0]); // color
    expected.extend_from_slice(&0.0f64.to_bits().to_be_bytes());
    expected.push(0); // main cue not adjusted
    expected.extend_from_slice(&0.0f64.to_bits().to_be_bytes());
    assert_eq!(raw, expected);
}

#[test]
fn empty_labels_are_rejected_on_encode() {
    let blob = QuickCuesBlob {
        hot_cues: vec![Some(HotCueBlob {
            label: String::new(),
            sample_offset: 100.0,
            color: Default::default(),
        })],
        adjusted_main_cue: 0.0,
        default_main_cue: 0.0,
        extra: Vec::new(),
    };
    assert!(matches!(blob.encode(), Err(CodecError::Malformed { .. })));
}

#[test]
fn adjusted_flag_follows_the_main_cues() {
    let mut blob = common::sample_quick_cues();
    blob.adjusted_main_cue = 500.0;
    blob.default_main_cue = 500.0;
    let raw = zlib_unwrap(&blob.encode().unwrap()).unwrap();
    // The flag byte sits between the two trailing cue doubles.
    assert_eq!(raw[raw.len() - 9], 0);

    blob.adjusted_main_cue = 501.0;
    let raw = zlib_unwrap(&blob.encode().unwrap()).unwrap();
    assert_eq!(raw[raw.len() - 9], 1);
}

#[test]
fn rejects_cleared_flag_with_differing_cues() {
    let blob = common::sample_quick_cues();
    let mut raw = zlib_unwrap(&blob.encode().unwrap()).unwrap();
    let flag_at = raw.len() - 9;
    assert_eq!(raw[flag_at], 1);
    raw[flag_at] = 0;
    let tampered = enginelib_blob::codec::zlib_wrap(&raw);
    assert!(matches!(
        QuickCuesBlob::decode(&tampered),
        Err(CodecError::Malformed { .. })
    ));
}

#[test]
fn rejects_truncated_cue_data() {
    let blob = common::sample_quick_cues();
    let raw = zlib_unwrap(&blob.encode().unwrap()).unwrap();
    let truncated = enginelib_blob::codec::zlib_wrap(&raw[..raw.len() - 8]);
    assert!(matches!(
        QuickCuesBlob::decode(&truncated),
        Err(CodecError::Malformed { .. })
    ));
}
