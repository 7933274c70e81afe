//! End-to-end scenarios against v1-family libraries on disk.

use std::time::Duration;

use enginelib::model::{Color, STANDARD_PAD_COLORS};
use enginelib::{
    BeatgridMarker, Database, Error, HotCue, Loop, MusicalKey, SchemaVersion, TrackSnapshot,
};

fn full_snapshot() -> TrackSnapshot {
    let mut hot_cues = vec![None; 8];
    hot_cues[0] = Some(HotCue {
        label: "Cue 1".to_owned(),
        sample_offset: 1_377_924.5,
        color: STANDARD_PAD_COLORS[0],
    });

    TrackSnapshot {
        sample_rate: Some(44100.0),
        sample_count: Some(17_452_800),
        bpm: Some(123.0),
        key: Some(MusicalKey::AMinor),
        beatgrid: vec![
            BeatgridMarker::new(-4, -83316.78),
            BeatgridMarker::new(812, 17_470_734.439),
        ],
        hot_cues,
        loops: vec![None; 8],
        relative_path: Some("a/b.mp3".to_owned()),
        ..Default::default()
    }
}

#[test]
fn created_track_round_trips_through_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = full_snapshot();

    {
        let db = Database::create(dir.path(), SchemaVersion::V1_7_1).unwrap();
        let track = db.create_track(&snapshot).unwrap();
        assert_eq!(track.relative_path().unwrap().as_deref(), Some("a/b.mp3"));
    }

    let db = Database::open(dir.path()).unwrap();
    let tracks = db.tracks().unwrap();
    assert_eq!(tracks.len(), 1);

    let read_back = tracks[0].snapshot().unwrap();
    let mut expected = snapshot;
    expected.id = Some(tracks[0].id());
    // Playing time was not supplied, so it is derived from the sampling
    // information: 17 452 800 samples at 44.1 kHz.
    expected.duration = Some(Duration::from_millis(395_755));
    assert_eq!(read_back, expected);

    assert_eq!(tracks[0].bpm().unwrap(), Some(123.0));
    assert_eq!(tracks[0].key().unwrap(), Some(MusicalKey::AMinor));
    assert_eq!(
        db.tracks_by_relative_path("a/b.mp3").unwrap().len(),
        1
    );
}

#[test]
fn empty_analysis_payload_has_no_performance_row() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::create(dir.path(), SchemaVersion::V1_7_1).unwrap();
    let track = db
        .create_track(&TrackSnapshot::with_relative_path("bare.mp3"))
        .unwrap();

    let count_rows = || -> i64 {
        let conn = rusqlite::Connection::open(dir.path().join("p.db")).unwrap();
        conn.query_row("SELECT COUNT(*) FROM PerformanceData", [], |row| row.get(0))
            .unwrap()
    };
    assert_eq!(count_rows(), 0);

    // Adding a beat grid brings the row into existence with a valid blob.
    let mut snapshot = track.snapshot().unwrap();
    snapshot.sample_rate = Some(44100.0);
    snapshot.sample_count = Some(1_000_000);
    snapshot.beatgrid = vec![
        BeatgridMarker::new(-4, 0.0),
        BeatgridMarker::new(404, 1_000_000.0),
    ];
    track.update(&snapshot).unwrap();

    assert_eq!(count_rows(), 1);
    assert_eq!(track.beatgrid().unwrap(), snapshot.beatgrid);

    // And removing every analysis field deletes the row again.
    let mut cleared = track.snapshot().unwrap();
    cleared.sample_rate = None;
    cleared.sample_count = None;
    cleared.duration = None;
    cleared.beatgrid.clear();
    cleared.hot_cues.clear();
    cleared.loops.clear();
    cleared.waveform.clear();
    cleared.main_cue = None;
    track.update(&cleared).unwrap();
    assert_eq!(count_rows(), 0);
}

#[test]
fn crate_names_must_not_contain_semicolons() {
    let db = Database::create_temporary(SchemaVersion::V1_7_1).unwrap();
    match db.create_root_crate("Rock;Pop") {
        Err(Error::CrateInvalidName { name }) => assert_eq!(name, "Rock;Pop"),
        other => panic!("expected CrateInvalidName, got {other:?}"),
    }
    assert!(matches!(
        db.create_root_crate(""),
        Err(Error::CrateInvalidName { .. })
    ));
}

#[test]
fn playlists_are_unsupported_on_v1() {
    let db = Database::create_temporary(SchemaVersion::V1_7_1).unwrap();
    assert!(matches!(
        db.create_root_playlist("Warmup"),
        Err(Error::UnsupportedOperation { .. })
    ));
    assert!(matches!(
        db.root_playlists(),
        Err(Error::UnsupportedOperation { .. })
    ));
}

#[test]
fn metadata_sentinel_rows_use_the_observed_order() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::create(dir.path(), SchemaVersion::V1_7_1).unwrap();
    let mut snapshot = full_snapshot();
    snapshot.title = Some("Mad (Original Mix)".to_owned());
    snapshot.rating = Some(60);
    let track = db.create_track(&snapshot).unwrap();
    let id = track.id();
    drop(db);

    let conn = rusqlite::Connection::open(dir.path().join("m.db")).unwrap();
    let str_types: Vec<i64> = conn
        .prepare("SELECT type FROM MetaData WHERE id = ? ORDER BY rowid")
        .unwrap()
        .query_map([id], |row| row.get(0))
        .unwrap()
        .map(Result::unwrap)
        .collect();
    assert_eq!(str_types, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 13, 15, 16]);

    let int_types: Vec<i64> = conn
        .prepare("SELECT type FROM MetaDataInteger WHERE id = ? ORDER BY rowid")
        .unwrap()
        .query_map([id], |row| row.get(0))
        .unwrap()
        .map(Result::unwrap)
        .collect();
    assert_eq!(int_types, vec![4, 5, 1, 2, 3, 6, 8, 7, 9, 10, 11]);
}

#[test]
fn rating_is_clamped_on_write() {
    let db = Database::create_temporary(SchemaVersion::V1_7_1).unwrap();
    let mut snapshot = TrackSnapshot::with_relative_path("r.mp3");
    snapshot.rating = Some(250);
    let track = db.create_track(&snapshot).unwrap();
    assert_eq!(track.rating().unwrap(), Some(100));
}

#[test]
fn oversized_cue_and_loop_sets_are_rejected() {
    let db = Database::create_temporary(SchemaVersion::V1_7_1).unwrap();

    let mut snapshot = TrackSnapshot::with_relative_path("c.mp3");
    snapshot.hot_cues = (0..9)
        .map(|i| {
            Some(HotCue {
                label: format!("Cue {i}"),
                sample_offset: 1000.0 * i as f64 + 1.0,
                color: Color::default(),
            })
        })
        .collect();
    assert!(matches!(
        db.create_track(&snapshot),
        Err(Error::HotCuesOverflow)
    ));

    let mut snapshot = TrackSnapshot::with_relative_path("l.mp3");
    snapshot.loops = (0..9)
        .map(|i| {
            Some(Loop {
                label: format!("Loop {i}"),
                start_sample_offset: 1000.0 * i as f64,
                end_sample_offset: 1000.0 * i as f64 + 500.0,
                color: Color::default(),
            })
        })
        .collect();
    assert!(matches!(
        db.create_track(&snapshot),
        Err(Error::LoopsOverflow)
    ));
}

#[test]
fn snapshot_id_must_match_the_updated_track() {
    let db = Database::create_temporary(SchemaVersion::V1_7_1).unwrap();
    let track = db
        .create_track(&TrackSnapshot::with_relative_path("x.mp3"))
        .unwrap();

    let mut snapshot = track.snapshot().unwrap();
    snapshot.id = Some(track.id() + 1);
    assert!(matches!(
        track.update(&snapshot),
        Err(Error::InvalidTrackSnapshot { .. })
    ));

    let snapshot = TrackSnapshot::default();
    assert!(matches!(
        db.create_track(&snapshot),
        Err(Error::InvalidTrackSnapshot { .. })
    ));
}

#[test]
fn removed_tracks_leave_their_handles_dangling() {
    let db = Database::create_temporary(SchemaVersion::V1_7_1).unwrap();
    let track = db
        .create_track(&TrackSnapshot::with_relative_path("gone.mp3"))
        .unwrap();
    let cr = db.create_root_crate("Bin").unwrap();
    cr.add_track(&track).unwrap();
    assert_eq!(cr.tracks().unwrap().len(), 1);

    db.remove_track(&track).unwrap();
    assert!(!track.is_valid().unwrap());
    assert!(matches!(
        track.snapshot(),
        Err(Error::TrackDeleted { .. })
    ));
    // Membership rows went with the track; the crate itself survives.
    assert!(cr.tracks().unwrap().is_empty());
    assert!(cr.is_valid().unwrap());
}

#[test]
fn overview_waveform_is_derived_at_fixed_size() {
    use enginelib::model::{WaveformEntry, WaveformPoint};
    use enginelib_blob::{
        calculate_overview_waveform_extents, OverviewWaveformBlob, OVERVIEW_WAVEFORM_SIZE,
    };

    let dir = tempfile::tempdir().unwrap();
    let db = Database::create(dir.path(), SchemaVersion::V1_7_1).unwrap();

    let sample_count = 17_452_800u64;
    let sample_rate = 44100.0;
    let size = enginelib::recommended_waveform_size(sample_count, sample_rate) as usize;

    let mut snapshot = TrackSnapshot::with_relative_path("wave.mp3");
    snapshot.sample_rate = Some(sample_rate);
    snapshot.sample_count = Some(sample_count as i64);
    snapshot.waveform = (0..size)
        .map(|i| {
            let v = (i % 256) as u8;
            WaveformEntry::new(
                WaveformPoint::new(v, 255),
                WaveformPoint::new(v / 2, 255),
                WaveformPoint::new(v / 3, 255),
            )
        })
        .collect();
    let track = db.create_track(&snapshot).unwrap();

    // The caller's high-resolution waveform reads back unchanged.
    assert_eq!(track.snapshot().unwrap().waveform, snapshot.waveform);

    // The stored overview waveform was resampled down to the fixed size.
    let conn = rusqlite::Connection::open(dir.path().join("p.db")).unwrap();
    let blob: Vec<u8> = conn
        .query_row(
            "SELECT overviewWaveFormData FROM PerformanceData WHERE id = ?",
            [track.id()],
            |row| row.get(0),
        )
        .unwrap();
    let overview = OverviewWaveformBlob::decode(&blob).unwrap();
    assert_eq!(overview.waveform.len() as u64, OVERVIEW_WAVEFORM_SIZE);

    let extents = calculate_overview_waveform_extents(sample_count, sample_rate);
    assert_eq!(overview.samples_per_entry, extents.samples_per_entry);
}

#[test]
fn set_beatgrid_writes_both_grids() {
    let db = Database::create_temporary(SchemaVersion::V1_9_1).unwrap();
    let mut snapshot = TrackSnapshot::with_relative_path("grid.mp3");
    snapshot.sample_rate = Some(44100.0);
    snapshot.sample_count = Some(2_000_000);
    let track = db.create_track(&snapshot).unwrap();

    let grid = vec![
        BeatgridMarker::new(-4, 100.0),
        BeatgridMarker::new(396, 1_900_000.0),
    ];
    track.set_beatgrid(grid.clone()).unwrap();
    assert_eq!(track.beatgrid().unwrap(), grid);
}
