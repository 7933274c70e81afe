//! Property-based round-trip laws: for every valid value of every blob
//! type, decoding its encoding yields the same value.

use enginelib_blob::*;
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;

fn arb_color() -> impl Strategy<Value = Color> {
    (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>())
        .prop_map(|(a, r, g, b)| Color { a, r, g, b })
}

fn arb_offset() -> impl Strategy<Value = f64> {
    // Finite, non-sentinel sample offsets.
    (0.0f64..1.0e9).prop_map(|v| (v * 1000.0).round() / 1000.0)
}

fn arb_label() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ]{1,40}"
}

fn arb_point() -> impl Strategy<Value = WaveformPoint> {
    (any::<u8>(), any::<u8>()).prop_map(|(value, opacity)| WaveformPoint { value, opacity })
}

fn arb_entry() -> impl Strategy<Value = WaveformEntry> {
    (arb_point(), arb_point(), arb_point())
        .prop_map(|(low, mid, high)| WaveformEntry { low, mid, high })
}

fn arb_opaque_entry() -> impl Strategy<Value = WaveformEntry> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(l, m, h)| {
        WaveformEntry::new(
            WaveformPoint::new(l, 255),
            WaveformPoint::new(m, 255),
            WaveformPoint::new(h, 255),
        )
    })
}

fn arb_beatgrid() -> impl Strategy<Value = Vec<BeatGridMarkerBlob>> {
    // Strictly increasing indices and offsets, at least two markers.
    vec((1i64..64, 1.0f64..50_000.0), 2..6).prop_map(|steps| {
        let mut index = -4i64;
        let mut offset = 0.0f64;
        let mut grid = Vec::with_capacity(steps.len());
        grid.push(BeatGridMarkerBlob::new(index, offset));
        for (di, doff) in steps {
            index += di;
            offset += doff;
            grid.push(BeatGridMarkerBlob::new(index, offset));
        }
        grid
    })
}

fn arb_beat_data() -> impl Strategy<Value = BeatDataBlob> {
    (
        prop_oneof![Just(Vec::new()), arb_beatgrid()],
        prop_oneof![Just(Vec::new()), arb_beatgrid()],
        0.0f64..200_000.0,
        0.0f64..1.0e9,
        0usize..10,
    )
        .prop_map(
            |(default_beatgrid, adjusted_beatgrid, sample_rate, sample_count, zeros)| {
                BeatDataBlob {
                    sample_rate,
                    sample_count,
                    is_beatgrid_set: true,
                    default_beatgrid,
                    adjusted_beatgrid,
                    extra: vec![0u8; zeros],
                }
            },
        )
}

fn arb_hot_cues() -> impl Strategy<Value = QuickCuesBlob> {
    (
        vec(
            option::of((arb_label(), arb_offset(), arb_color()).prop_map(
                |(label, sample_offset, color)| HotCueBlob {
                    label,
                    sample_offset,
                    color,
                },
            )),
            MAX_HOT_CUES,
        ),
        arb_offset(),
    )
        .prop_map(|(hot_cues, main_cue)| QuickCuesBlob {
            hot_cues,
            adjusted_main_cue: main_cue,
            default_main_cue: main_cue,
            extra: Vec::new(),
        })
}

fn arb_loops() -> impl Strategy<Value = LoopsBlob> {
    vec(
        option::of((arb_label(), arb_offset(), arb_offset(), arb_color()).prop_map(
            |(label, start, len, color)| LoopBlob {
                label,
                start_sample_offset: start,
                end_sample_offset: start + len,
                color,
            },
        )),
        MAX_LOOPS,
    )
    .prop_map(|loops| LoopsBlob { loops })
}

proptest! {
    #[test]
    fn track_data_single_band_round_trips(
        sample_rate in 0.0f64..200_000.0,
        sample_count in 0i64..1_000_000_000,
        loudness in 0.0f64..=1.0,
        key in 0i32..24,
    ) {
        let blob = TrackDataBlob::new(sample_rate, sample_count, loudness, key);
        let decoded = TrackDataBlob::decode_single_band(&blob.encode_single_band().unwrap()).unwrap();
        prop_assert_eq!(decoded, blob);
    }

    #[test]
    fn track_data_three_band_round_trips(
        sample_rate in 0.0f64..200_000.0,
        sample_count in 0i64..1_000_000_000,
        loudness in 0.0f64..=1.0,
        key in 0i32..24,
    ) {
        let blob = TrackDataBlob::new(sample_rate, sample_count, loudness, key);
        let decoded = TrackDataBlob::decode_three_band(&blob.encode_three_band().unwrap()).unwrap();
        prop_assert_eq!(decoded, blob);
    }

    #[test]
    fn beat_data_round_trips(blob in arb_beat_data()) {
        let decoded = BeatDataBlob::decode(&blob.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, blob);
    }

    #[test]
    fn quick_cues_round_trip(blob in arb_hot_cues()) {
        let decoded = QuickCuesBlob::decode(&blob.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, blob);
    }

    #[test]
    fn loops_round_trip(blob in arb_loops()) {
        let decoded = LoopsBlob::decode(&blob.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, blob);
    }

    #[test]
    fn overview_waveform_round_trips(
        entries in vec(arb_opaque_entry(), 0..64),
        samples_per_entry in 0.0f64..100_000.0,
    ) {
        let blob = OverviewWaveformBlob { samples_per_entry, waveform: entries, extra: Vec::new() };
        let decoded = OverviewWaveformBlob::decode(&blob.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, blob);
    }

    #[test]
    fn high_res_waveform_round_trips(
        entries in vec(arb_entry(), 0..64),
        samples_per_entry in 0.0f64..100_000.0,
    ) {
        let blob = HighResWaveformBlob { samples_per_entry, waveform: entries, extra: Vec::new() };
        let decoded = HighResWaveformBlob::decode(&blob.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, blob);
    }
}
