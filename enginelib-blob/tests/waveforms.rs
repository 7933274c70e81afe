use enginelib_blob::codec::zlib_unwrap;
use enginelib_blob::*;

mod common;

#[test]
fn quantisation_number_follows_the_sample_rate() {
    assert_eq!(waveform_quantisation_number(44100.0), 420);
    assert_eq!(waveform_quantisation_number(48000.0), 456);
    assert_eq!(waveform_quantisation_number(96000.0), 914);
    assert_eq!(waveform_quantisation_number(0.0), 0);
}

#[test]
fn high_resolution_extents_use_the_quantisation_number() {
    let extents = calculate_high_resolution_waveform_extents(17_452_800, 44100.0);
    assert_eq!(extents.samples_per_entry, 420.0);
    // Ceiling division.
    assert_eq!(extents.size, (17_452_800 + 419) / 420);

    assert_eq!(
        calculate_high_resolution_waveform_extents(0, 44100.0),
        WaveformExtents::default()
    );
    assert_eq!(
        calculate_high_resolution_waveform_extents(1000, 0.0),
        WaveformExtents::default()
    );
}

#[test]
fn overview_extents_round_down_to_the_quantisation_number() {
    let extents = calculate_overview_waveform_extents(17_452_800, 44100.0);
    assert_eq!(extents.size, OVERVIEW_WAVEFORM_SIZE);
    let rounded = (17_452_800 / 420) * 420;
    assert_eq!(
        extents.samples_per_entry,
        rounded as f64 / OVERVIEW_WAVEFORM_SIZE as f64
    );
}

#[test]
fn overview_waveform_round_trips_with_opaque_points() {
    let blob = OverviewWaveformBlob {
        samples_per_entry: 17036.25,
        waveform: common::ramp_waveform(1024),
        extra: Vec::new(),
    };
    let decoded = OverviewWaveformBlob::decode(&blob.encode().unwrap()).unwrap();
    assert_eq!(decoded, blob);
    assert!(decoded
        .waveform
        .iter()
        .all(|e| e.low.opacity == 255 && e.mid.opacity == 255 && e.high.opacity == 255));
}

#[test]
fn overview_waveform_stores_maxima_after_the_entries() {
    let blob = OverviewWaveformBlob {
        samples_per_entry: 100.0,
        waveform: vec![
            WaveformEntry::new(
                WaveformPoint::new(10, 255),
                WaveformPoint::new(90, 255),
                WaveformPoint::new(30, 255),
            ),
            WaveformEntry::new(
                WaveformPoint::new(70, 255),
                WaveformPoint::new(20, 255),
                WaveformPoint::new(60, 255),
            ),
        ],
        extra: Vec::new(),
    };
    let raw = zlib_unwrap(&blob.encode().unwrap()).unwrap();
    assert_eq!(&raw[raw.len() - 3..], &[70, 90, 60]);
}

#[test]
fn high_res_waveform_round_trips() {
    let extents = calculate_high_resolution_waveform_extents(441_000, 44100.0);
    let blob = HighResWaveformBlob {
        samples_per_entry: extents.samples_per_entry,
        waveform: common::ramp_waveform(extents.size as usize),
        extra: Vec::new(),
    };
    let decoded = HighResWaveformBlob::decode(&blob.encode().unwrap()).unwrap();
    assert_eq!(decoded, blob);
}

#[test]
fn waveforms_reject_conflicting_length_fields() {
    let blob = OverviewWaveformBlob {
        samples_per_entry: 100.0,
        waveform: common::ramp_waveform(4),
        extra: Vec::new(),
    };
    let mut raw = zlib_unwrap(&blob.encode().unwrap()).unwrap();
    raw[15] = raw[15].wrapping_add(1); // second length field
    let tampered = enginelib_blob::codec::zlib_wrap(&raw);
    assert!(matches!(
        OverviewWaveformBlob::decode(&tampered),
        Err(CodecError::Malformed { .. })
    ));
}
