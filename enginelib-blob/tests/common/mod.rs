#![allow(dead_code)]

use enginelib_blob::*;

pub fn sample_beat_data() -> BeatDataBlob {
    BeatDataBlob {
        sample_rate: 44100.0,
        sample_count: 17_452_800.0,
        is_beatgrid_set: true,
        default_beatgrid: vec![
            BeatGridMarkerBlob::new(-4, -83316.78),
            BeatGridMarkerBlob::new(812, 17_470_734.439),
        ],
        adjusted_beatgrid: vec![
            BeatGridMarkerBlob::new(-4, -84904.768),
            BeatGridMarkerBlob::new(812, 17_469_046.451),
        ],
        extra: Vec::new(),
    }
}

pub fn sample_quick_cues() -> QuickCuesBlob {
    let mut hot_cues = vec![None; MAX_HOT_CUES];
    hot_cues[0] = Some(HotCueBlob {
        label: "Cue 1".to_owned(),
        sample_offset: 1_377_924.5,
        color: Color::new(0xFF, 0xEA, 0xC5, 0x32),
    });
    hot_cues[2] = Some(HotCueBlob {
        label: "Cue 3".to_owned(),
        sample_offset: 5_508_265.964,
        color: Color::new(0xFF, 0xB8, 0x55, 0xBF),
    });
    QuickCuesBlob {
        hot_cues,
        adjusted_main_cue: 1_377_924.5,
        default_main_cue: 1144.012,
        extra: Vec::new(),
    }
}

pub fn sample_loops() -> LoopsBlob {
    let mut loops = vec![None; MAX_LOOPS];
    loops[0] = Some(LoopBlob {
        label: "Loop 1".to_owned(),
        start_sample_offset: 1144.012,
        end_sample_offset: 345_339.134,
        color: Color::new(0xFF, 0xEA, 0xC5, 0x32),
    });
    loops[3] = Some(LoopBlob {
        label: "Loop 4".to_owned(),
        start_sample_offset: 4_131_485.476,
        end_sample_offset: 4_303_583.037,
        color: Color::new(0xFF, 0xBA, 0x2A, 0x41),
    });
    LoopsBlob { loops }
}

pub fn ramp_waveform(size: usize) -> Vec<WaveformEntry> {
    (0..size)
        .map(|i| {
            let value = (i * 255 / size.max(1)) as u8;
            WaveformEntry::new(
                WaveformPoint::new(value, 255),
                WaveformPoint::new(value / 2, 255),
                WaveformPoint::new(value / 3, 255),
            )
        })
        .collect()
}
