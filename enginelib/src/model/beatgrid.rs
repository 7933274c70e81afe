use crate::error::Error;
use crate::Result;

/// A pair anchoring a beat number to an absolute sample position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatgridMarker {
    pub index: i64,
    pub sample_offset: f64,
}

impl BeatgridMarker {
    pub fn new(index: i64, sample_offset: f64) -> Self {
        BeatgridMarker {
            index,
            sample_offset,
        }
    }
}

/// Rewrites a beat grid into the shape the hardware expects: the first
/// marker anchored at beat −4 (shifted backwards along the grid's own
/// samples-per-beat), and the last marker advanced just past the end of
/// the track.
///
/// Markers beyond the track end are dropped, keeping the first of them;
/// leading markers entirely before sample zero are dropped, keeping the
/// last of them. A grid that leaves fewer than two markers after this is
/// rejected.
pub fn normalize_beatgrid(
    mut beatgrid: Vec<BeatgridMarker>,
    sample_count: i64,
) -> Result<Vec<BeatgridMarker>> {
    if beatgrid.is_empty() {
        return Ok(beatgrid);
    }

    if let Some(first_beyond) = beatgrid
        .iter()
        .position(|marker| marker.sample_offset > sample_count as f64)
    {
        beatgrid.truncate(first_beyond + 1);
    }

    if let Some(first_positive) = beatgrid
        .iter()
        .position(|marker| marker.sample_offset > 0.0)
    {
        if first_positive > 0 {
            beatgrid.drain(..first_positive - 1);
        }
    }

    if beatgrid.len() < 2 {
        return Err(Error::invalid_snapshot(
            "attempted to normalize a misplaced beatgrid",
        ));
    }

    {
        let samples_per_beat = (beatgrid[1].sample_offset - beatgrid[0].sample_offset)
            / (beatgrid[1].index - beatgrid[0].index) as f64;
        beatgrid[0].sample_offset -= (4 + beatgrid[0].index) as f64 * samples_per_beat;
        beatgrid[0].index = -4;
    }

    {
        let last = beatgrid.len() - 1;
        let samples_per_beat = (beatgrid[last].sample_offset - beatgrid[last - 1].sample_offset)
            / (beatgrid[last].index - beatgrid[last - 1].index) as f64;
        let index_adjustment = ((sample_count as f64 - beatgrid[last].sample_offset)
            / samples_per_beat)
            .ceil() as i64;
        beatgrid[last].sample_offset += index_adjustment as f64 * samples_per_beat;
        beatgrid[last].index += index_adjustment;
    }

    Ok(beatgrid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_passes_through() {
        assert!(normalize_beatgrid(Vec::new(), 1000).unwrap().is_empty());
    }

    #[test]
    fn single_marker_is_rejected() {
        let grid = vec![BeatgridMarker::new(0, 100.0)];
        assert!(matches!(
            normalize_beatgrid(grid, 1000),
            Err(Error::InvalidTrackSnapshot { .. })
        ));
    }

    #[test]
    fn grid_is_anchored_at_minus_four_and_past_the_end() {
        // 1000 samples per beat, markers at beats 0 and 10.
        let grid = vec![
            BeatgridMarker::new(0, 500.0),
            BeatgridMarker::new(10, 10_500.0),
        ];
        let normalized = normalize_beatgrid(grid, 20_000).unwrap();

        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].index, -4);
        assert!((normalized[0].sample_offset - (-3500.0)).abs() < 1e-9);

        let last = normalized.last().unwrap();
        assert!(last.sample_offset >= 20_000.0);
        assert!(last.sample_offset - 20_000.0 < 1000.0);
        assert_eq!(last.index, 10 + 10);
    }

    #[test]
    fn markers_beyond_the_end_are_trimmed() {
        let grid = vec![
            BeatgridMarker::new(0, 500.0),
            BeatgridMarker::new(4, 4500.0),
            BeatgridMarker::new(8, 8500.0),
            BeatgridMarker::new(12, 12_500.0),
        ];
        let normalized = normalize_beatgrid(grid, 5000).unwrap();
        // Markers after the first one past the end are gone; the kept one
        // is pulled back to just past the end.
        assert_eq!(normalized.len(), 3);
        assert_eq!(normalized[0].index, -4);
        let last = normalized.last().unwrap();
        assert_eq!(last.index, 5);
        assert!((last.sample_offset - 5500.0).abs() < 1e-9);
    }
}
