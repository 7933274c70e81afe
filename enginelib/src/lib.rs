//! Reader/writer for the on-disk database family used by Engine Library
//! DJ hardware and software.
//!
//! A library directory holds one or two SQLite files depending on the
//! schema family: `m.db` plus `p.db` for the v1 family, or
//! `Database2/m.db` for the v2 family. [`Database::open`] detects the
//! schema version and routes every read and write through the
//! version-correct code path; [`Database::create`] builds a fresh library
//! at any supported version.
//!
//! Performance data (beat grids, cues, loops, waveforms) is stored in
//! compact binary blobs; their codecs live in the `enginelib-blob` crate
//! and are re-exported here through the domain model.

pub mod db;
pub mod error;
pub mod model;
pub mod schema;
pub mod version;

mod util;

pub use db::{ChangeLogRow, Crate, Database, InformationRow, Playlist, Track, TransactionScope};
pub use error::Error;
pub use model::{
    normalize_beatgrid, recommended_waveform_size, BeatgridMarker, HotCue, ImportInfo, Loop,
    MusicalKey, TrackSnapshot,
};
pub use version::{SchemaFamily, SchemaVersion};

pub type Result<T> = std::result::Result<T, Error>;
