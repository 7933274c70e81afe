use enginelib_blob::{CodecError, LoopBlob, LoopsBlob};

mod common;

#[test]
fn loops_round_trip() {
    let blob = common::sample_loops();
    let decoded = LoopsBlob::decode(&blob.encode().unwrap()).unwrap();
    assert_eq!(decoded, blob);
}

#[test]
fn loops_are_not_zlib_wrapped() {
    let blob = common::sample_loops();
    let encoded = blob.encode().unwrap();
    // A zlib frame would start with a 4-byte big-endian length; the loops
    // blob starts with the little-endian slot count instead.
    assert_eq!(&encoded[..8], &8i64.to_le_bytes());
}

#[test]
fn slot_is_set_only_when_both_endpoint_flags_are_set() {
    let blob = common::sample_loops();
    let mut encoded = blob.encode().unwrap();

    // Clear the is-end-set flag of the first loop: count(8) + label_len(1)
    // + label(6) + start(8) + end(8) + is_start(1) = offset of is_end.
    let is_end_at = 8 + 1 + 6 + 8 + 8 + 1;
    assert_eq!(encoded[is_end_at], 1);
    encoded[is_end_at] = 0;

    let decoded = LoopsBlob::decode(&encoded).unwrap();
    assert!(decoded.loops[0].is_none());
    assert!(decoded.loops[3].is_some());
}

#[test]
fn empty_labels_are_rejected_on_encode() {
    let blob = LoopsBlob {
        loops: vec![Some(LoopBlob {
            label: String::new(),
            start_sample_offset: 0.0,
            end_sample_offset: 100.0,
            color: Default::default(),
        })],
    };
    assert!(matches!(blob.encode(), Err(CodecError::Malformed { .. })));
}

#[test]
fn rejects_trailing_data() {
    let blob = common::sample_loops();
    let mut encoded = blob.encode().unwrap();
    encoded.push(0);
    assert!(matches!(
        LoopsBlob::decode(&encoded),
        Err(CodecError::Malformed { .. })
    ));
}

#[test]
fn rejects_short_input() {
    assert!(matches!(
        LoopsBlob::decode(&[0, 0, 0]),
        Err(CodecError::Malformed { .. })
    ));
}
