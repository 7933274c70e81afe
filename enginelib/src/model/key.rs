/// All musical keys a track may be detected to follow, in the order used
/// by the stored key numbers: around the circle of fifths, alternating
/// major and relative minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicalKey {
    CMajor = 0,
    AMinor,
    GMajor,
    EMinor,
    DMajor,
    BMinor,
    AMajor,
    FSharpMinor,
    EMajor,
    DFlatMinor,
    BMajor,
    AFlatMinor,
    FSharpMajor,
    EFlatMinor,
    DFlatMajor,
    BFlatMinor,
    AFlatMajor,
    FMinor,
    EFlatMajor,
    CMinor,
    BFlatMajor,
    GMinor,
    FMajor,
    DMinor,
}

impl MusicalKey {
    /// The integer written to blobs and metadata rows.
    pub fn as_number(self) -> i32 {
        self as i32
    }

    /// Maps a stored key number back to a key. Numbers outside the known
    /// range are treated as absent.
    pub fn from_number(value: i32) -> Option<MusicalKey> {
        use MusicalKey::*;
        const KEYS: [MusicalKey; 24] = [
            CMajor, AMinor, GMajor, EMinor, DMajor, BMinor, AMajor, FSharpMinor, EMajor,
            DFlatMinor, BMajor, AFlatMinor, FSharpMajor, EFlatMinor, DFlatMajor, BFlatMinor,
            AFlatMajor, FMinor, EFlatMajor, CMinor, BFlatMajor, GMinor, FMajor, DMinor,
        ];
        usize::try_from(value).ok().and_then(|i| KEYS.get(i).copied())
    }
}

impl std::fmt::Display for MusicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use MusicalKey::*;
        let text = match self {
            CMajor => "C",
            AMinor => "Am",
            GMajor => "G",
            EMinor => "Em",
            DMajor => "D",
            BMinor => "Bm",
            AMajor => "A",
            FSharpMinor => "F#m",
            EMajor => "E",
            DFlatMinor => "Dbm",
            BMajor => "B",
            AFlatMinor => "Abm",
            FSharpMajor => "F#",
            EFlatMinor => "Ebm",
            DFlatMajor => "Db",
            BFlatMinor => "Bbm",
            AFlatMajor => "Ab",
            FMinor => "Fm",
            EFlatMajor => "Eb",
            CMinor => "Cm",
            BFlatMajor => "Bb",
            GMinor => "Gm",
            FMajor => "F",
            DMinor => "Dm",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_numbers_round_trip() {
        for n in 0..24 {
            let key = MusicalKey::from_number(n).unwrap();
            assert_eq!(key.as_number(), n);
        }
        assert_eq!(MusicalKey::from_number(-1), None);
        assert_eq!(MusicalKey::from_number(24), None);
        assert_eq!(MusicalKey::from_number(1), Some(MusicalKey::AMinor));
    }
}
