//! The enumerated set of supported schema versions.
//!
//! Versions fall into two families with different filesystem layouts: v1
//! libraries keep music data in `m.db` and performance data in a separate
//! `p.db`, while v2 libraries keep everything in `Database2/m.db`.
//! Capability methods on [`SchemaVersion`] drive every version-dependent
//! branch in the storage layer, mirroring how the reference
//! implementations gate column sets on the schema version.

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaFamily {
    /// `m.db` + `p.db`, crates only.
    V1,
    /// `Database2/m.db`, crates and ordered playlists.
    V2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    V1_6_0,
    V1_7_1,
    V1_9_1,
    V1_11_1,
    V1_13_0,
    V1_13_1,
    V1_13_2,
    V1_15_0,
    V1_17_0,
    /// Desktop variant of 1.18.0: boolean columns are declared `NUMERIC`.
    V1_18_0Desktop,
    /// OS (hardware player) variant of 1.18.0: boolean columns are
    /// declared `INTEGER`.
    V1_18_0Os,
    V2_0_0,
    V2_1_0,
    V3_0_0,
}

use SchemaVersion::*;

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 14] = [
        V1_6_0,
        V1_7_1,
        V1_9_1,
        V1_11_1,
        V1_13_0,
        V1_13_1,
        V1_13_2,
        V1_15_0,
        V1_17_0,
        V1_18_0Desktop,
        V1_18_0Os,
        V2_0_0,
        V2_1_0,
        V3_0_0,
    ];

    /// The schema version triple stored in the `Information` row.
    pub fn triple(self) -> (i64, i64, i64) {
        match self {
            V1_6_0 => (1, 6, 0),
            V1_7_1 => (1, 7, 1),
            V1_9_1 => (1, 9, 1),
            V1_11_1 => (1, 11, 1),
            V1_13_0 => (1, 13, 0),
            V1_13_1 => (1, 13, 1),
            V1_13_2 => (1, 13, 2),
            V1_15_0 => (1, 15, 0),
            V1_17_0 => (1, 17, 0),
            V1_18_0Desktop | V1_18_0Os => (1, 18, 0),
            V2_0_0 => (2, 0, 0),
            V2_1_0 => (2, 1, 0),
            V3_0_0 => (3, 0, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            V1_6_0 => "1.6.0",
            V1_7_1 => "1.7.1",
            V1_9_1 => "1.9.1",
            V1_11_1 => "1.11.1",
            V1_13_0 => "1.13.0",
            V1_13_1 => "1.13.1",
            V1_13_2 => "1.13.2",
            V1_15_0 => "1.15.0",
            V1_17_0 => "1.17.0",
            V1_18_0Desktop => "1.18.0-desktop",
            V1_18_0Os => "1.18.0-os",
            V2_0_0 => "2.0.0",
            V2_1_0 => "2.1.0",
            V3_0_0 => "3.0.0",
        }
    }

    pub fn family(self) -> SchemaFamily {
        if self.triple().0 >= 2 {
            SchemaFamily::V2
        } else {
            SchemaFamily::V1
        }
    }

    pub(crate) fn at_least(self, major: i64, minor: i64, patch: i64) -> bool {
        self.triple() >= (major, minor, patch)
    }

    /// `Track.pdbImportKey` exists from 1.7.1 onwards.
    pub(crate) fn has_pdb_import_key(self) -> bool {
        self.at_least(1, 7, 1)
    }

    /// `PerformanceData.hasRekordboxValues` exists from 1.7.1 onwards.
    pub(crate) fn has_rekordbox_flag(self) -> bool {
        self.at_least(1, 7, 1)
    }

    /// `PerformanceData.hasTraktorValues` exists from 1.9.1 onwards.
    pub(crate) fn has_traktor_flag(self) -> bool {
        self.at_least(1, 9, 1)
    }

    /// `Track.fileBytes` and `Track.uri` exist from 1.13.0 onwards.
    pub(crate) fn has_file_bytes_and_uri(self) -> bool {
        self.at_least(1, 13, 0)
    }

    /// `Track.isBeatGridLocked` exists from 1.18.0 onwards.
    pub(crate) fn has_beatgrid_locked(self) -> bool {
        self.at_least(1, 18, 0)
    }

    /// From 1.18.0, crates are a subtype of a generic `List` table and the
    /// `Crate` tables become views; ids must then be allocated by hand
    /// because the list table has no autoincrement.
    pub(crate) fn uses_list_table(self) -> bool {
        self.at_least(1, 18, 0)
    }

    /// Ordered playlists exist in the v2 family only.
    pub(crate) fn supports_playlists(self) -> bool {
        self.family() == SchemaFamily::V2
    }

    /// The v2 track-summary blob carries three average-loudness bands.
    pub(crate) fn three_band_loudness(self) -> bool {
        self.family() == SchemaFamily::V2
    }

    /// The `ChangeLog` table exists in 2.x only; 3.0 removed it.
    pub(crate) fn has_change_log(self) -> bool {
        self.triple().0 == 2
    }

    /// An integer-metadata row of type 12 is written from 1.9.1 onwards.
    pub(crate) fn writes_unknown_int_12(self) -> bool {
        self.at_least(1, 9, 1)
    }

    /// A string-metadata row of type 17 is written from 1.13.0 onwards.
    pub(crate) fn writes_unknown_str_17(self) -> bool {
        self.at_least(1, 13, 0)
    }

    /// The declared type of boolean-ish columns. The 1.18.0 OS variant and
    /// the v2 family declare them `INTEGER`; everything else uses the
    /// legacy `NUMERIC`.
    pub(crate) fn boolean_decl_type(self) -> &'static str {
        match self {
            V1_18_0Os => "INTEGER",
            v if v.family() == SchemaFamily::V2 => "INTEGER",
            _ => "NUMERIC",
        }
    }

    /// Resolves a stored version triple to the unique matching version.
    ///
    /// (1, 18, 0) is ambiguous between two variants and cannot be resolved
    /// from the triple alone; it is reported as unsupported here and the
    /// caller must disambiguate by column-type introspection.
    pub(crate) fn from_unambiguous_triple(
        major: i64,
        minor: i64,
        patch: i64,
    ) -> Result<SchemaVersion, Error> {
        SchemaVersion::ALL
            .iter()
            .copied()
            .find(|v| v.triple() == (major, minor, patch) && v.triple() != (1, 18, 0))
            .ok_or(Error::UnsupportedVersion {
                major,
                minor,
                patch,
            })
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triples_are_unique_apart_from_the_1_18_variants() {
        for a in SchemaVersion::ALL {
            for b in SchemaVersion::ALL {
                if a != b && a.triple() == b.triple() {
                    assert_eq!(a.triple(), (1, 18, 0));
                }
            }
        }
    }

    #[test]
    fn ambiguous_triple_is_not_resolved() {
        assert!(matches!(
            SchemaVersion::from_unambiguous_triple(1, 18, 0),
            Err(Error::UnsupportedVersion { .. })
        ));
        assert!(matches!(
            SchemaVersion::from_unambiguous_triple(9, 9, 9),
            Err(Error::UnsupportedVersion { .. })
        ));
        assert_eq!(
            SchemaVersion::from_unambiguous_triple(1, 7, 1).unwrap(),
            V1_7_1
        );
    }

    #[test]
    fn family_split() {
        assert_eq!(V1_18_0Os.family(), SchemaFamily::V1);
        assert_eq!(V2_0_0.family(), SchemaFamily::V2);
        assert!(V2_0_0.supports_playlists());
        assert!(!V1_7_1.supports_playlists());
        assert!(V2_0_0.has_change_log());
        assert!(!V3_0_0.has_change_log());
    }
}
