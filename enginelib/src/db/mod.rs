//! The storage facade: opening, creating and introspecting libraries,
//! and the id-plus-shared-handle types for tracks, crates and playlists.

mod convert;
mod crates;
mod information;
mod metadata;
mod performance;
mod playlists;
mod storage;
mod track_table;
mod transaction;

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use enginelib_blob::BeatGridMarkerBlob;
use rusqlite::{Connection, OpenFlags};

pub use information::{ChangeLogRow, InformationRow};
pub use transaction::TransactionScope;

use crate::error::Error;
use crate::model::{BeatgridMarker, HotCue, Loop, MusicalKey, TrackSnapshot};
use crate::schema::{self, SchemaOps};
use crate::version::{SchemaFamily, SchemaVersion};
use crate::Result;
use storage::Storage;

fn music_db_path_v1(directory: &Path) -> PathBuf {
    directory.join("m.db")
}

fn perf_db_path_v1(directory: &Path) -> PathBuf {
    directory.join("p.db")
}

fn db_dir_v2(directory: &Path) -> PathBuf {
    directory.join("Database2")
}

fn music_db_path_v2(directory: &Path) -> PathBuf {
    db_dir_v2(directory).join("m.db")
}

/// Opens an in-memory connection with the two v1 files attached as the
/// `music` and `perfdata` schemas. Unqualified table names resolve to
/// the music file first, and to the performance file for the tables that
/// exist only there.
fn attach_v1(music: &str, perfdata: &str) -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute("ATTACH DATABASE ? AS music", [music])?;
    conn.execute("ATTACH DATABASE ? AS perfdata", [perfdata])?;
    conn.execute_batch("PRAGMA foreign_keys = ON")?;
    Ok(conn)
}

fn open_v2_file(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON")?;
    Ok(conn)
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Reads the version triple from a database file's `Information` table,
/// disambiguating the 1.18.0 variants by the declared type of a boolean
/// `Track` column.
fn detect_version_in_file(conn: &Connection, directory: &Path) -> Result<SchemaVersion> {
    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE name = 'Information'",
        [],
        |row| row.get(0),
    )?;
    if table_count != 1 {
        return Err(Error::inconsistency(format!(
            "no Information table in the database under {directory:?}"
        )));
    }

    let (major, minor, patch): (i64, i64, i64) = conn.query_row(
        "SELECT schemaVersionMajor, schemaVersionMinor, schemaVersionPatch FROM Information",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    if (major, minor, patch) == (1, 18, 0) {
        // Two 1.18.0 variants share the version triple and differ only in
        // declared column types. Anything else with this triple is not a
        // database this library knows how to interpret.
        let mut stmt = conn.prepare("PRAGMA table_info('Track')")?;
        let column_type: Option<String> = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?))
            })?
            .filter_map(|row| row.ok())
            .find(|(name, _)| name == "isExternalTrack")
            .map(|(_, decl_type)| decl_type);

        return match column_type.as_deref() {
            Some("NUMERIC") => Ok(SchemaVersion::V1_18_0Desktop),
            Some("INTEGER") => Ok(SchemaVersion::V1_18_0Os),
            _ => Err(Error::UnsupportedVersion {
                major,
                minor,
                patch,
            }),
        };
    }

    SchemaVersion::from_unambiguous_triple(major, minor, patch)
}

fn detect_version(directory: &Path) -> Result<SchemaVersion> {
    let v2_path = music_db_path_v2(directory);
    if v2_path.is_file() {
        let conn = Connection::open_with_flags(&v2_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        return detect_version_in_file(&conn, directory);
    }

    let v1_path = music_db_path_v1(directory);
    if v1_path.is_file() {
        let conn = Connection::open_with_flags(&v1_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        return detect_version_in_file(&conn, directory);
    }

    Err(Error::DatabaseNotFound {
        directory: directory.to_path_buf(),
    })
}

/// An open Engine library.
///
/// The handle owns its SQLite connection and is not safe to share across
/// threads; open independent handles for concurrent access. Cloning a
/// `Database` (or any handle derived from it) shares the same connection.
#[derive(Clone)]
pub struct Database {
    storage: Rc<Storage>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("directory", &self.storage.directory)
            .field("version", &self.storage.version)
            .field("uuid", &self.storage.uuid)
            .finish()
    }
}

impl Database {
    fn from_parts(conn: Connection, version: SchemaVersion, directory: PathBuf) -> Result<Self> {
        use rusqlite::OptionalExtension;
        let uuid: String = conn
            .query_row("SELECT uuid FROM Information", [], |row| row.get(0))
            .optional()?
            .ok_or_else(|| Error::inconsistency("the Information table has no rows"))?;
        Ok(Database {
            storage: Rc::new(Storage::new(conn, version, directory, uuid)),
        })
    }

    /// Opens an existing library directory, detecting its schema version.
    pub fn open(directory: impl AsRef<Path>) -> Result<Database> {
        let directory = directory.as_ref();
        let version = detect_version(directory)?;

        let conn = match version.family() {
            SchemaFamily::V1 => attach_v1(
                &path_str(&music_db_path_v1(directory)),
                &path_str(&perf_db_path_v1(directory)),
            )?,
            SchemaFamily::V2 => open_v2_file(&music_db_path_v2(directory))?,
        };

        Database::from_parts(conn, version, directory.to_path_buf())
    }

    /// Creates a fresh library of the given version in a directory. The
    /// directory is created if missing; an existing database file is an
    /// error.
    pub fn create(directory: impl AsRef<Path>, version: SchemaVersion) -> Result<Database> {
        let directory = directory.as_ref();

        let conn = match version.family() {
            SchemaFamily::V1 => {
                if music_db_path_v1(directory).exists() {
                    return Err(Error::DatabaseAlreadyExists {
                        directory: directory.to_path_buf(),
                    });
                }
                std::fs::create_dir_all(directory)?;
                attach_v1(
                    &path_str(&music_db_path_v1(directory)),
                    &path_str(&perf_db_path_v1(directory)),
                )?
            }
            SchemaFamily::V2 => {
                if music_db_path_v2(directory).exists() {
                    return Err(Error::DatabaseAlreadyExists {
                        directory: directory.to_path_buf(),
                    });
                }
                std::fs::create_dir_all(db_dir_v2(directory))?;
                open_v2_file(&music_db_path_v2(directory))?
            }
        };

        schema::schema_ops(version).create(&conn)?;
        Database::from_parts(conn, version, directory.to_path_buf())
    }

    /// Creates an in-memory library of the given version. Nothing
    /// persists beyond the handle.
    pub fn create_temporary(version: SchemaVersion) -> Result<Database> {
        let conn = match version.family() {
            SchemaFamily::V1 => attach_v1(":memory:", ":memory:")?,
            SchemaFamily::V2 => {
                let conn = Connection::open_in_memory()?;
                conn.execute_batch("PRAGMA foreign_keys = ON")?;
                conn
            }
        };
        schema::schema_ops(version).create(&conn)?;
        Database::from_parts(conn, version, PathBuf::from(":memory:"))
    }

    /// Opens the library in a directory, creating it at the given version
    /// when none exists. The boolean reports whether a library was
    /// created.
    pub fn create_or_open(
        directory: impl AsRef<Path>,
        version: SchemaVersion,
    ) -> Result<(Database, bool)> {
        match Database::open(directory.as_ref()) {
            Ok(db) => Ok((db, false)),
            Err(Error::DatabaseNotFound { .. }) => {
                Ok((Database::create(directory, version)?, true))
            }
            Err(e) => Err(e),
        }
    }

    /// Whether a directory holds an openable library.
    pub fn exists(directory: impl AsRef<Path>) -> Result<bool> {
        match Database::open(directory) {
            Ok(_) => Ok(true),
            Err(Error::DatabaseNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.storage.version
    }

    pub fn version_name(&self) -> &'static str {
        self.storage.version.name()
    }

    pub fn directory(&self) -> &Path {
        &self.storage.directory
    }

    /// UUID of the library's `Information` row.
    pub fn uuid(&self) -> &str {
        &self.storage.uuid
    }

    /// The full `Information` row of the music database.
    pub fn information(&self) -> Result<InformationRow> {
        information::get(&self.storage)
    }

    /// Validates the live schema against the expectations for the
    /// detected version.
    pub fn verify(&self) -> Result<()> {
        schema::schema_ops(self.storage.version).verify(&self.storage.conn)
    }

    /// Begins a savepoint-backed transaction scope.
    pub fn begin_transaction(&self) -> Result<TransactionScope> {
        TransactionScope::begin(Rc::clone(&self.storage))
    }

    fn track(&self, id: i64) -> Track {
        Track {
            storage: Rc::clone(&self.storage),
            id,
        }
    }

    fn crate_handle(&self, id: i64) -> Crate {
        Crate {
            storage: Rc::clone(&self.storage),
            id,
        }
    }

    fn playlist(&self, id: i64) -> Playlist {
        Playlist {
            storage: Rc::clone(&self.storage),
            id,
        }
    }

    /// Creates a track from a snapshot and returns its handle.
    pub fn create_track(&self, snapshot: &TrackSnapshot) -> Result<Track> {
        let id = convert::create_track(&self.storage, snapshot)?;
        Ok(self.track(id))
    }

    pub fn track_by_id(&self, id: i64) -> Result<Option<Track>> {
        Ok(track_table::exists(&self.storage, id)?.then(|| self.track(id)))
    }

    pub fn tracks(&self) -> Result<Vec<Track>> {
        let ids = track_table::all_ids(&self.storage)?;
        Ok(ids.into_iter().map(|id| self.track(id)).collect())
    }

    pub fn tracks_by_relative_path(&self, relative_path: &str) -> Result<Vec<Track>> {
        let ids = track_table::ids_by_relative_path(&self.storage, relative_path)?;
        Ok(ids.into_iter().map(|id| self.track(id)).collect())
    }

    /// Removes a track. Crate and playlist membership rows referencing it
    /// are removed along with it; crates themselves are untouched.
    pub fn remove_track(&self, track: &Track) -> Result<()> {
        self.ensure_same_library(&track.storage)?;
        track_table::remove(&self.storage, track.id)
    }

    pub fn create_root_crate(&self, name: &str) -> Result<Crate> {
        let id = crates::create_root(&self.storage, name)?;
        Ok(self.crate_handle(id))
    }

    pub fn crate_by_id(&self, id: i64) -> Result<Option<Crate>> {
        Ok(crates::exists(&self.storage, id)?.then(|| self.crate_handle(id)))
    }

    pub fn crates(&self) -> Result<Vec<Crate>> {
        let ids = crates::all_ids(&self.storage)?;
        Ok(ids.into_iter().map(|id| self.crate_handle(id)).collect())
    }

    pub fn crates_by_name(&self, name: &str) -> Result<Vec<Crate>> {
        let ids = crates::ids_by_name(&self.storage, name)?;
        Ok(ids.into_iter().map(|id| self.crate_handle(id)).collect())
    }

    pub fn root_crates(&self) -> Result<Vec<Crate>> {
        let ids = crates::root_ids(&self.storage)?;
        Ok(ids.into_iter().map(|id| self.crate_handle(id)).collect())
    }

    pub fn root_crate_by_name(&self, name: &str) -> Result<Option<Crate>> {
        let id = crates::root_id_by_name(&self.storage, name)?;
        Ok(id.map(|id| self.crate_handle(id)))
    }

    /// Removes a crate. Its tracks are not removed; its sub-crates become
    /// orphaned of their parent rows but keep their own content.
    pub fn remove_crate(&self, cr: &Crate) -> Result<()> {
        self.ensure_same_library(&cr.storage)?;
        crates::remove(&self.storage, cr.id)
    }

    /// Creates a root playlist (v2 libraries only).
    pub fn create_root_playlist(&self, name: &str) -> Result<Playlist> {
        let id = playlists::create_root(&self.storage, name)?;
        Ok(self.playlist(id))
    }

    pub fn playlist_by_id(&self, id: i64) -> Result<Option<Playlist>> {
        Ok(playlists::exists(&self.storage, id)?.then(|| self.playlist(id)))
    }

    pub fn playlists(&self) -> Result<Vec<Playlist>> {
        let ids = playlists::all_ids(&self.storage)?;
        Ok(ids.into_iter().map(|id| self.playlist(id)).collect())
    }

    /// Root playlists in sibling order.
    pub fn root_playlists(&self) -> Result<Vec<Playlist>> {
        let ids = playlists::root_ids(&self.storage)?;
        Ok(ids.into_iter().map(|id| self.playlist(id)).collect())
    }

    pub fn root_playlist_by_name(&self, name: &str) -> Result<Option<Playlist>> {
        let id = playlists::find_id(&self.storage, None, name)?;
        Ok(id.map(|id| self.playlist(id)))
    }

    pub fn remove_playlist(&self, playlist: &Playlist) -> Result<()> {
        self.ensure_same_library(&playlist.storage)?;
        playlists::remove(&self.storage, playlist.id)
    }

    /// All change-log rows, optionally only those after a known id.
    /// Available on 2.x libraries only.
    pub fn change_log(&self, after: Option<i64>) -> Result<Vec<ChangeLogRow>> {
        information::change_log(&self.storage, after)
    }

    fn ensure_same_library(&self, other: &Rc<Storage>) -> Result<()> {
        if Rc::ptr_eq(&self.storage, other) || self.storage.uuid == other.uuid {
            Ok(())
        } else {
            Err(Error::inconsistency(
                "handle belongs to a different library",
            ))
        }
    }
}

/// A track handle: an id plus the shared library handle. All accessors
/// read live storage; nothing is cached client-side.
#[derive(Clone)]
pub struct Track {
    storage: Rc<Storage>,
    id: i64,
}

impl std::fmt::Debug for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Track").field("id", &self.id).finish()
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.storage.uuid == other.storage.uuid
    }
}

impl Track {
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Whether the underlying row still exists.
    pub fn is_valid(&self) -> Result<bool> {
        track_table::exists(&self.storage, self.id)
    }

    /// Assembles the full version-neutral snapshot of this track.
    pub fn snapshot(&self) -> Result<TrackSnapshot> {
        convert::read_snapshot(&self.storage, self.id)
    }

    /// Replaces the track's row, metadata and performance data from a
    /// snapshot.
    pub fn update(&self, snapshot: &TrackSnapshot) -> Result<()> {
        convert::update_track(&self.storage, self.id, snapshot)
    }

    pub fn relative_path(&self) -> Result<Option<String>> {
        Ok(track_table::get(&self.storage, self.id)?.relative_path)
    }

    pub fn title(&self) -> Result<Option<String>> {
        metadata::get_str(&self.storage, self.id, metadata::StrType::Title)
    }

    pub fn artist(&self) -> Result<Option<String>> {
        metadata::get_str(&self.storage, self.id, metadata::StrType::Artist)
    }

    pub fn album(&self) -> Result<Option<String>> {
        metadata::get_str(&self.storage, self.id, metadata::StrType::Album)
    }

    pub fn genre(&self) -> Result<Option<String>> {
        metadata::get_str(&self.storage, self.id, metadata::StrType::Genre)
    }

    pub fn comment(&self) -> Result<Option<String>> {
        metadata::get_str(&self.storage, self.id, metadata::StrType::Comment)
    }

    pub fn publisher(&self) -> Result<Option<String>> {
        metadata::get_str(&self.storage, self.id, metadata::StrType::Publisher)
    }

    pub fn composer(&self) -> Result<Option<String>> {
        metadata::get_str(&self.storage, self.id, metadata::StrType::Composer)
    }

    pub fn duration(&self) -> Result<Option<Duration>> {
        let length = track_table::get(&self.storage, self.id)?.length;
        Ok(length.map(|secs| Duration::from_secs(secs.max(0) as u64)))
    }

    pub fn bpm(&self) -> Result<Option<f64>> {
        let row = track_table::get(&self.storage, self.id)?;
        Ok(row.bpm_analyzed.or(row.bpm.map(|b| b as f64)))
    }

    pub fn key(&self) -> Result<Option<MusicalKey>> {
        Ok(self.snapshot()?.key)
    }

    pub fn rating(&self) -> Result<Option<i32>> {
        let value = metadata::get_int(&self.storage, self.id, metadata::IntType::Rating)?;
        Ok(value.filter(|v| *v != convert::RATING_NONE).map(|v| v as i32))
    }

    pub fn last_played_at(&self) -> Result<Option<DateTime<Utc>>> {
        let ts = metadata::get_int(&self.storage, self.id, metadata::IntType::LastPlayedTs)?;
        Ok(ts.and_then(|t| DateTime::from_timestamp(t, 0)))
    }

    pub fn average_loudness(&self) -> Result<Option<f64>> {
        let perf = performance::get(&self.storage, self.id)?;
        Ok(perf
            .and_then(|p| p.track_data)
            .map(|t| t.average_loudness_low)
            .filter(|v| *v != 0.0))
    }

    /// The adjusted beat grid.
    pub fn beatgrid(&self) -> Result<Vec<BeatgridMarker>> {
        let beat_data = performance::get_beat_data(&self.storage, self.id)?;
        Ok(beat_data
            .adjusted_beatgrid
            .iter()
            .map(|m| BeatgridMarker::new(m.beat_index, m.sample_offset))
            .collect())
    }

    /// Replaces both the default and the adjusted beat grid.
    pub fn set_beatgrid(&self, beatgrid: Vec<BeatgridMarker>) -> Result<()> {
        convert::ensure_valid_beatgrid(&beatgrid)?;
        let scope = TransactionScope::begin(Rc::clone(&self.storage))?;
        let mut beat_data = performance::get_beat_data(&self.storage, self.id)?;
        let markers: Vec<BeatGridMarkerBlob> = beatgrid
            .iter()
            .map(|m| BeatGridMarkerBlob::new(m.index, m.sample_offset))
            .collect();
        beat_data.is_beatgrid_set = true;
        beat_data.default_beatgrid = markers.clone();
        beat_data.adjusted_beatgrid = markers;
        performance::set_beat_data(&self.storage, self.id, &beat_data)?;
        scope.commit()?;
        Ok(())
    }

    pub fn main_cue(&self) -> Result<Option<f64>> {
        Ok(self.snapshot()?.main_cue)
    }

    pub fn hot_cues(&self) -> Result<Vec<Option<HotCue>>> {
        Ok(self.snapshot()?.hot_cues)
    }

    pub fn loops(&self) -> Result<Vec<Option<Loop>>> {
        Ok(self.snapshot()?.loops)
    }

    /// Crates whose track lists contain this track.
    pub fn containing_crates(&self) -> Result<Vec<Crate>> {
        let ids = crates::crate_ids_containing_track(&self.storage, self.id)?;
        Ok(ids
            .into_iter()
            .map(|id| Crate {
                storage: Rc::clone(&self.storage),
                id,
            })
            .collect())
    }
}

/// A crate handle: an id plus the shared library handle.
#[derive(Clone)]
pub struct Crate {
    storage: Rc<Storage>,
    id: i64,
}

impl std::fmt::Debug for Crate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crate").field("id", &self.id).finish()
    }
}

impl PartialEq for Crate {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.storage.uuid == other.storage.uuid
    }
}

impl Crate {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn is_valid(&self) -> Result<bool> {
        crates::exists(&self.storage, self.id)
    }

    pub fn name(&self) -> Result<String> {
        crates::name(&self.storage, self.id)
    }

    /// The semicolon-delimited path from the root to this crate,
    /// including it, with a trailing semicolon.
    pub fn path(&self) -> Result<String> {
        crates::path(&self.storage, self.id)
    }

    pub fn parent(&self) -> Result<Option<Crate>> {
        let parent = crates::parent_id(&self.storage, self.id)?;
        Ok(parent.map(|id| Crate {
            storage: Rc::clone(&self.storage),
            id,
        }))
    }

    /// Immediate sub-crates.
    pub fn children(&self) -> Result<Vec<Crate>> {
        let ids = crates::child_ids(&self.storage, self.id)?;
        Ok(ids
            .into_iter()
            .map(|id| Crate {
                storage: Rc::clone(&self.storage),
                id,
            })
            .collect())
    }

    /// All transitive sub-crates, from the closure table.
    pub fn descendants(&self) -> Result<Vec<Crate>> {
        let ids = crates::descendant_ids(&self.storage, self.id)?;
        Ok(ids
            .into_iter()
            .map(|id| Crate {
                storage: Rc::clone(&self.storage),
                id,
            })
            .collect())
    }

    pub fn create_sub_crate(&self, name: &str) -> Result<Crate> {
        let id = crates::create_sub(&self.storage, self.id, name)?;
        Ok(Crate {
            storage: Rc::clone(&self.storage),
            id,
        })
    }

    pub fn sub_crate_by_name(&self, name: &str) -> Result<Option<Crate>> {
        let id = crates::sub_crate_id_by_name(&self.storage, self.id, name)?;
        Ok(id.map(|id| Crate {
            storage: Rc::clone(&self.storage),
            id,
        }))
    }

    /// Renames the crate and recomputes the paths of every descendant.
    pub fn set_name(&self, name: &str) -> Result<()> {
        crates::rename(&self.storage, self.id, name)
    }

    /// Moves the crate under a new parent (or to root level for `None`).
    /// Re-parenting onto itself or one of its descendants is rejected.
    pub fn set_parent(&self, parent: Option<&Crate>) -> Result<()> {
        crates::set_parent(&self.storage, self.id, parent.map(|p| p.id))
    }

    pub fn tracks(&self) -> Result<Vec<Track>> {
        let ids = crates::track_ids(&self.storage, self.id)?;
        Ok(ids
            .into_iter()
            .map(|id| Track {
                storage: Rc::clone(&self.storage),
                id,
            })
            .collect())
    }

    pub fn add_track(&self, track: &Track) -> Result<()> {
        crates::add_track(&self.storage, self.id, track.id)
    }

    pub fn remove_track(&self, track: &Track) -> Result<()> {
        crates::remove_track(&self.storage, self.id, track.id)
    }

    pub fn clear_tracks(&self) -> Result<()> {
        crates::clear_tracks(&self.storage, self.id)
    }
}

/// A playlist handle (v2 libraries only): like a crate, but with ordered
/// membership.
#[derive(Clone)]
pub struct Playlist {
    storage: Rc<Storage>,
    id: i64,
}

impl std::fmt::Debug for Playlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Playlist").field("id", &self.id).finish()
    }
}

impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.storage.uuid == other.storage.uuid
    }
}

impl Playlist {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn is_valid(&self) -> Result<bool> {
        playlists::exists(&self.storage, self.id)
    }

    pub fn name(&self) -> Result<String> {
        playlists::name(&self.storage, self.id)
    }

    pub fn path(&self) -> Result<String> {
        playlists::path(&self.storage, self.id)
    }

    pub fn parent(&self) -> Result<Option<Playlist>> {
        let parent = playlists::parent_id(&self.storage, self.id)?;
        Ok(parent.map(|id| Playlist {
            storage: Rc::clone(&self.storage),
            id,
        }))
    }

    /// Immediate sub-playlists, in sibling order.
    pub fn children(&self) -> Result<Vec<Playlist>> {
        let ids = playlists::child_ids(&self.storage, self.id)?;
        Ok(ids
            .into_iter()
            .map(|id| Playlist {
                storage: Rc::clone(&self.storage),
                id,
            })
            .collect())
    }

    pub fn create_sub_playlist(&self, name: &str) -> Result<Playlist> {
        let id = playlists::create_sub(&self.storage, self.id, name)?;
        Ok(Playlist {
            storage: Rc::clone(&self.storage),
            id,
        })
    }

    pub fn sub_playlist_by_name(&self, name: &str) -> Result<Option<Playlist>> {
        let id = playlists::find_id(&self.storage, Some(self.id), name)?;
        Ok(id.map(|id| Playlist {
            storage: Rc::clone(&self.storage),
            id,
        }))
    }

    pub fn set_name(&self, name: &str) -> Result<()> {
        playlists::rename(&self.storage, self.id, name)
    }

    pub fn set_parent(&self, parent: Option<&Playlist>) -> Result<()> {
        playlists::set_parent(&self.storage, self.id, parent.map(|p| p.id))
    }

    /// Tracks in playlist order.
    pub fn tracks(&self) -> Result<Vec<Track>> {
        let ids = playlists::track_ids(&self.storage, self.id)?;
        Ok(ids
            .into_iter()
            .map(|id| Track {
                storage: Rc::clone(&self.storage),
                id,
            })
            .collect())
    }

    /// Appends a track at the end of the playlist.
    pub fn add_track_back(&self, track: &Track) -> Result<()> {
        playlists::add_track_back(&self.storage, self.id, track.id)
    }

    /// Splices a track in immediately after another track of this
    /// playlist.
    pub fn add_track_after(&self, track: &Track, after: &Track) -> Result<()> {
        playlists::add_track_after(&self.storage, self.id, track.id, after.id)
    }

    pub fn remove_track(&self, track: &Track) -> Result<()> {
        playlists::remove_track(&self.storage, self.id, track.id)
    }

    pub fn clear_tracks(&self) -> Result<()> {
        playlists::clear_tracks(&self.storage, self.id)
    }
}
