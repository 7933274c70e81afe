use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no Engine library found in directory {directory:?}")]
    DatabaseNotFound { directory: PathBuf },

    #[error("an Engine library already exists in directory {directory:?}")]
    DatabaseAlreadyExists { directory: PathBuf },

    #[error("unsupported Engine library schema version {major}.{minor}.{patch}")]
    UnsupportedVersion { major: i64, minor: i64, patch: i64 },

    #[error("schema mismatch: {detail}")]
    SchemaMismatch { detail: String },

    #[error("operation not supported by this schema version: {what}")]
    UnsupportedOperation { what: &'static str },

    #[error("crate {id} has been deleted")]
    CrateDeleted { id: i64 },

    #[error("track {id} has been deleted")]
    TrackDeleted { id: i64 },

    #[error("playlist {id} has been deleted")]
    PlaylistDeleted { id: i64 },

    #[error("invalid crate name {name:?}")]
    CrateInvalidName { name: String },

    #[error("invalid playlist name {name:?}")]
    PlaylistInvalidName { name: String },

    #[error("invalid crate parent")]
    CrateInvalidParent,

    #[error("invalid playlist parent")]
    PlaylistInvalidParent,

    #[error("a crate named {name:?} already exists under the same parent")]
    CrateAlreadyExists { name: String },

    #[error("a playlist named {name:?} already exists under the same parent")]
    PlaylistAlreadyExists { name: String },

    #[error("more than {max} hot cues supplied", max = enginelib_blob::MAX_HOT_CUES)]
    HotCuesOverflow,

    #[error("more than {max} loops supplied", max = enginelib_blob::MAX_LOOPS)]
    LoopsOverflow,

    #[error("invalid track snapshot: {reason}")]
    InvalidTrackSnapshot { reason: String },

    #[error("database is inconsistent: {reason}")]
    DatabaseInconsistency { reason: String, id: Option<i64> },

    #[error(transparent)]
    Codec(#[from] enginelib_blob::CodecError),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn inconsistency(reason: impl Into<String>) -> Self {
        Error::DatabaseInconsistency {
            reason: reason.into(),
            id: None,
        }
    }

    pub(crate) fn inconsistency_for(reason: impl Into<String>, id: i64) -> Self {
        Error::DatabaseInconsistency {
            reason: reason.into(),
            id: Some(id),
        }
    }

    pub(crate) fn schema_mismatch(detail: impl Into<String>) -> Self {
        Error::SchemaMismatch {
            detail: detail.into(),
        }
    }

    pub(crate) fn invalid_snapshot(reason: impl Into<String>) -> Self {
        Error::InvalidTrackSnapshot {
            reason: reason.into(),
        }
    }
}
