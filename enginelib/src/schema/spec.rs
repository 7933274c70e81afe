//! Expected table, column and index shapes for every supported schema
//! version. The creator emits DDL from these specs and the verifier
//! compares a live database against them, so the two can never drift
//! apart.

use crate::version::SchemaVersion;

#[derive(Debug, Clone, Copy)]
pub(crate) struct FkRef {
    pub table: &'static str,
    pub column: &'static str,
    pub on_delete: &'static str,
}

#[derive(Debug, Clone)]
pub(crate) struct ColumnSpec {
    pub name: &'static str,
    pub decl_type: &'static str,
    pub notnull: bool,
    pub default: Option<&'static str>,
    /// 1-based position within the primary key, 0 when not part of it.
    pub pk: i64,
    pub references: Option<FkRef>,
}

#[derive(Debug, Clone)]
pub(crate) struct IndexSpec {
    pub name: String,
    pub unique: bool,
    /// "c" for CREATE INDEX, "pk" for a primary-key autoindex.
    pub origin: &'static str,
    pub columns: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub(crate) struct TableSpec {
    pub name: &'static str,
    pub columns: Vec<ColumnSpec>,
    pub indices: Vec<IndexSpec>,
    /// Raw table-level constraints appended to the generated DDL, e.g.
    /// composite foreign keys. Not introspected by the verifier.
    pub extra_constraints: Vec<&'static str>,
}

fn col(name: &'static str, decl_type: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        decl_type,
        notnull: false,
        default: None,
        pk: 0,
        references: None,
    }
}

fn col_pk(name: &'static str, decl_type: &'static str, pk: i64) -> ColumnSpec {
    ColumnSpec {
        pk,
        ..col(name, decl_type)
    }
}

fn col_fk(
    name: &'static str,
    decl_type: &'static str,
    table: &'static str,
    column: &'static str,
    on_delete: &'static str,
) -> ColumnSpec {
    ColumnSpec {
        references: Some(FkRef {
            table,
            column,
            on_delete,
        }),
        ..col(name, decl_type)
    }
}

fn idx(table: &'static str, column: &'static str) -> IndexSpec {
    IndexSpec {
        name: format!("index_{table}_{column}"),
        unique: false,
        origin: "c",
        columns: vec![column],
    }
}

fn pk_autoindex(table: &'static str, columns: Vec<&'static str>) -> IndexSpec {
    IndexSpec {
        name: format!("sqlite_autoindex_{table}_1"),
        unique: true,
        origin: "pk",
        columns,
    }
}

fn table(name: &'static str, columns: Vec<ColumnSpec>, indices: Vec<IndexSpec>) -> TableSpec {
    TableSpec {
        name,
        columns,
        indices,
        extra_constraints: Vec::new(),
    }
}

fn track_table(v: SchemaVersion) -> TableSpec {
    let booleans = v.boolean_decl_type();
    let mut columns = vec![
        col_pk("id", "INTEGER", 1),
        col("playOrder", "INTEGER"),
        col("length", "INTEGER"),
        col("lengthCalculated", "INTEGER"),
        col("bpm", "INTEGER"),
        col("year", "INTEGER"),
        col("path", "TEXT"),
        col("filename", "TEXT"),
        col("bitrate", "INTEGER"),
        col("bpmAnalyzed", "REAL"),
        col("trackType", "INTEGER"),
        col("isExternalTrack", booleans),
        col("uuidOfExternalDatabase", "TEXT"),
        col("idTrackInExternalDatabase", "INTEGER"),
        col_fk("idAlbumArt", "INTEGER", "AlbumArt", "id", "RESTRICT"),
    ];
    if v.has_pdb_import_key() {
        columns.push(col("pdbImportKey", "INTEGER"));
    }
    if v.has_file_bytes_and_uri() {
        columns.push(col("fileBytes", "INTEGER"));
        columns.push(col("uri", "TEXT"));
    }
    if v.has_beatgrid_locked() {
        columns.push(ColumnSpec {
            default: Some("0"),
            ..col("isBeatGridLocked", booleans)
        });
    }

    let mut indices = vec![
        idx("Track", "id"),
        idx("Track", "path"),
        idx("Track", "filename"),
        idx("Track", "isExternalTrack"),
        idx("Track", "uuidOfExternalDatabase"),
        idx("Track", "idTrackInExternalDatabase"),
        idx("Track", "idAlbumArt"),
    ];
    if v.at_least(1, 11, 1) {
        indices.push(idx("Track", "bpm"));
    }
    if v.at_least(1, 13, 1) {
        indices.push(idx("Track", "year"));
    }
    if v.at_least(1, 15, 0) {
        indices.push(idx("Track", "length"));
    }
    if v.at_least(1, 18, 0) {
        indices.push(idx("Track", "uri"));
    }

    table("Track", columns, indices)
}

fn information_table() -> TableSpec {
    table(
        "Information",
        vec![
            col_pk("id", "INTEGER", 1),
            col("uuid", "TEXT"),
            col("schemaVersionMajor", "INTEGER"),
            col("schemaVersionMinor", "INTEGER"),
            col("schemaVersionPatch", "INTEGER"),
            col("currentPlayedIndiciator", "INTEGER"),
            col("lastRekordBoxLibraryImportReadCounter", "INTEGER"),
        ],
        vec![idx("Information", "id")],
    )
}

fn meta_data_table() -> TableSpec {
    table(
        "MetaData",
        vec![
            ColumnSpec {
                pk: 1,
                ..col_fk("id", "INTEGER", "Track", "id", "CASCADE")
            },
            col_pk("type", "INTEGER", 2),
            col("text", "TEXT"),
        ],
        vec![
            idx("MetaData", "id"),
            idx("MetaData", "type"),
            idx("MetaData", "text"),
            pk_autoindex("MetaData", vec!["id", "type"]),
        ],
    )
}

fn meta_data_integer_table() -> TableSpec {
    table(
        "MetaDataInteger",
        vec![
            ColumnSpec {
                pk: 1,
                ..col_fk("id", "INTEGER", "Track", "id", "CASCADE")
            },
            col_pk("type", "INTEGER", 2),
            col("value", "INTEGER"),
        ],
        vec![
            idx("MetaDataInteger", "id"),
            idx("MetaDataInteger", "type"),
            idx("MetaDataInteger", "value"),
            pk_autoindex("MetaDataInteger", vec!["id", "type"]),
        ],
    )
}

fn album_art_table() -> TableSpec {
    table(
        "AlbumArt",
        vec![
            col_pk("id", "INTEGER", 1),
            col("hash", "TEXT"),
            col("albumArt", "BLOB"),
        ],
        vec![idx("AlbumArt", "id"), idx("AlbumArt", "hash")],
    )
}

fn copied_track_table() -> TableSpec {
    table(
        "CopiedTrack",
        vec![
            ColumnSpec {
                pk: 1,
                ..col_fk("trackId", "INTEGER", "Track", "id", "CASCADE")
            },
            col("uuidOfSourceDatabase", "TEXT"),
            col("idOfTrackInSourceDatabase", "INTEGER"),
        ],
        vec![idx("CopiedTrack", "trackId")],
    )
}

/// The dedicated list tables of schemas before 1.18.0.
fn legacy_list_tables(v: SchemaVersion) -> Vec<TableSpec> {
    let mut history_track_list_indices = vec![
        idx("HistorylistTrackList", "historylistId"),
        idx("HistorylistTrackList", "trackId"),
        idx("HistorylistTrackList", "date"),
    ];
    if v.at_least(1, 13, 2) {
        history_track_list_indices.push(idx("HistorylistTrackList", "databaseUuid"));
    }

    vec![
        table(
            "Playlist",
            vec![col_pk("id", "INTEGER", 1), col("title", "TEXT")],
            vec![idx("Playlist", "id")],
        ),
        table(
            "PlaylistTrackList",
            vec![
                col_fk("playlistId", "INTEGER", "Playlist", "id", "CASCADE"),
                col_fk("trackId", "INTEGER", "Track", "id", "CASCADE"),
                col("trackIdInOriginDatabase", "INTEGER"),
                col("databaseUuid", "TEXT"),
                col("trackNumber", "INTEGER"),
            ],
            vec![
                idx("PlaylistTrackList", "playlistId"),
                idx("PlaylistTrackList", "trackId"),
            ],
        ),
        table(
            "Preparelist",
            vec![col_pk("id", "INTEGER", 1), col("title", "TEXT")],
            vec![idx("Preparelist", "id")],
        ),
        table(
            "PreparelistTrackList",
            vec![
                col_fk("playlistId", "INTEGER", "Preparelist", "id", "CASCADE"),
                col_fk("trackId", "INTEGER", "Track", "id", "CASCADE"),
                col("trackIdInOriginDatabase", "INTEGER"),
                col("databaseUuid", "TEXT"),
                col("trackNumber", "INTEGER"),
            ],
            vec![
                idx("PreparelistTrackList", "playlistId"),
                idx("PreparelistTrackList", "trackId"),
            ],
        ),
        table(
            "Historylist",
            vec![col_pk("id", "INTEGER", 1), col("title", "TEXT")],
            vec![idx("Historylist", "id")],
        ),
        table(
            "HistorylistTrackList",
            vec![
                col_fk("historylistId", "INTEGER", "Historylist", "id", "CASCADE"),
                col_fk("trackId", "INTEGER", "Track", "id", "CASCADE"),
                col("trackIdInOriginDatabase", "INTEGER"),
                col("databaseUuid", "TEXT"),
                col("date", "INTEGER"),
            ],
            history_track_list_indices,
        ),
        table(
            "Crate",
            vec![
                col_pk("id", "INTEGER", 1),
                col("title", "TEXT"),
                col("path", "TEXT"),
            ],
            vec![
                idx("Crate", "id"),
                idx("Crate", "title"),
                idx("Crate", "path"),
            ],
        ),
        table(
            "CrateParentList",
            vec![
                col_fk("crateOriginId", "INTEGER", "Crate", "id", "CASCADE"),
                col_fk("crateParentId", "INTEGER", "Crate", "id", "CASCADE"),
            ],
            vec![
                idx("CrateParentList", "crateOriginId"),
                idx("CrateParentList", "crateParentId"),
            ],
        ),
        table(
            "CrateTrackList",
            vec![
                col_fk("crateId", "INTEGER", "Crate", "id", "CASCADE"),
                col_fk("trackId", "INTEGER", "Track", "id", "CASCADE"),
            ],
            vec![
                idx("CrateTrackList", "crateId"),
                idx("CrateTrackList", "trackId"),
            ],
        ),
        table(
            "CrateHierarchy",
            vec![
                col_fk("crateId", "INTEGER", "Crate", "id", "CASCADE"),
                col_fk("crateIdChild", "INTEGER", "Crate", "id", "CASCADE"),
            ],
            vec![
                idx("CrateHierarchy", "crateId"),
                idx("CrateHierarchy", "crateIdChild"),
            ],
        ),
    ]
}

/// The generic list tables of 1.18.0, where the crate tables become views.
fn list_tables_1_18(v: SchemaVersion) -> Vec<TableSpec> {
    let booleans = v.boolean_decl_type();
    let list = table(
        "List",
        vec![
            col_pk("id", "INTEGER", 1),
            col_pk("type", "INTEGER", 2),
            col("title", "TEXT"),
            col("path", "TEXT"),
            col("isFolder", booleans),
            col("trackCount", "INTEGER"),
            col("ordering", "INTEGER"),
            ColumnSpec {
                default: Some("1"),
                ..col("isExplicitlyExported", booleans)
            },
        ],
        vec![
            idx("List", "id"),
            idx("List", "type"),
            idx("List", "path"),
            idx("List", "ordering"),
            pk_autoindex("List", vec!["id", "type"]),
        ],
    );

    let mut list_track_list = table(
        "ListTrackList",
        vec![
            col_pk("id", "INTEGER", 1),
            col("listId", "INTEGER"),
            col("listType", "INTEGER"),
            col_fk("trackId", "INTEGER", "Track", "id", "CASCADE"),
            col("trackIdInOriginDatabase", "INTEGER"),
            col("databaseUuid", "TEXT"),
            col("trackNumber", "INTEGER"),
        ],
        vec![
            idx("ListTrackList", "listId"),
            idx("ListTrackList", "listType"),
            idx("ListTrackList", "trackId"),
        ],
    );
    list_track_list.extra_constraints = vec![
        "FOREIGN KEY ( [listId], [listType] ) REFERENCES List ( [id], [type] ) ON DELETE CASCADE",
    ];

    let mut list_hierarchy = table(
        "ListHierarchy",
        vec![
            col("listId", "INTEGER"),
            col("listType", "INTEGER"),
            col("listIdChild", "INTEGER"),
            col("listTypeChild", "INTEGER"),
        ],
        vec![
            idx("ListHierarchy", "listId"),
            idx("ListHierarchy", "listType"),
            idx("ListHierarchy", "listIdChild"),
            idx("ListHierarchy", "listTypeChild"),
        ],
    );
    list_hierarchy.extra_constraints = vec![
        "FOREIGN KEY ( [listId], [listType] ) REFERENCES List ( [id], [type] ) ON DELETE CASCADE",
        "FOREIGN KEY ( [listIdChild], [listTypeChild] ) REFERENCES List ( [id], [type] ) ON DELETE CASCADE",
    ];

    let mut list_parent_list = table(
        "ListParentList",
        vec![
            col("listOriginId", "INTEGER"),
            col("listOriginType", "INTEGER"),
            col("listParentId", "INTEGER"),
            col("listParentType", "INTEGER"),
        ],
        vec![
            idx("ListParentList", "listOriginId"),
            idx("ListParentList", "listOriginType"),
            idx("ListParentList", "listParentId"),
            idx("ListParentList", "listParentType"),
        ],
    );
    list_parent_list.extra_constraints = vec![
        "FOREIGN KEY ( [listOriginId], [listOriginType] ) REFERENCES List ( [id], [type] ) ON DELETE CASCADE",
        "FOREIGN KEY ( [listParentId], [listParentType] ) REFERENCES List ( [id], [type] ) ON DELETE CASCADE",
    ];

    vec![
        list,
        list_track_list,
        list_hierarchy,
        list_parent_list,
        table(
            "Pack",
            vec![
                col_pk("id", "INTEGER", 1),
                col("packId", "TEXT"),
                col("changeLogDatabaseUuid", "TEXT"),
                col("changeLogId", "INTEGER"),
            ],
            Vec::new(),
        ),
        table(
            "ChangeLog",
            vec![col_pk("id", "INTEGER", 1), col("itemId", "INTEGER")],
            Vec::new(),
        ),
    ]
}

/// The single shared-id-space list tables of the v2 family.
fn list_tables_v2(v: SchemaVersion) -> Vec<TableSpec> {
    let booleans = v.boolean_decl_type();

    let mut playlist_entity_indices = vec![
        idx("PlaylistEntity", "listId"),
        idx("PlaylistEntity", "trackId"),
    ];
    if v.at_least(2, 1, 0) {
        playlist_entity_indices.push(idx("PlaylistEntity", "nextEntityId"));
    }

    let mut tables = vec![
        table(
            "List",
            vec![
                col_pk("id", "INTEGER", 1),
                col("type", "INTEGER"),
                col("title", "TEXT"),
                col("path", "TEXT"),
                col("isFolder", booleans),
                col("trackCount", "INTEGER"),
                col("nextListId", "INTEGER"),
                ColumnSpec {
                    default: Some("1"),
                    ..col("isExplicitlyExported", booleans)
                },
            ],
            vec![
                idx("List", "id"),
                idx("List", "type"),
                idx("List", "path"),
                idx("List", "nextListId"),
            ],
        ),
        table(
            "ListParentList",
            vec![
                col_fk("listOriginId", "INTEGER", "List", "id", "CASCADE"),
                col_fk("listParentId", "INTEGER", "List", "id", "CASCADE"),
            ],
            vec![
                idx("ListParentList", "listOriginId"),
                idx("ListParentList", "listParentId"),
            ],
        ),
        table(
            "ListHierarchy",
            vec![
                col_fk("listId", "INTEGER", "List", "id", "CASCADE"),
                col_fk("listIdChild", "INTEGER", "List", "id", "CASCADE"),
            ],
            vec![
                idx("ListHierarchy", "listId"),
                idx("ListHierarchy", "listIdChild"),
            ],
        ),
        table(
            "ListTrackList",
            vec![
                col_pk("id", "INTEGER", 1),
                col_fk("listId", "INTEGER", "List", "id", "CASCADE"),
                col_fk("trackId", "INTEGER", "Track", "id", "CASCADE"),
                col("trackIdInOriginDatabase", "INTEGER"),
                col("databaseUuid", "TEXT"),
                col("trackNumber", "INTEGER"),
            ],
            vec![
                idx("ListTrackList", "listId"),
                idx("ListTrackList", "trackId"),
            ],
        ),
        table(
            "PlaylistEntity",
            vec![
                col_pk("id", "INTEGER", 1),
                col_fk("listId", "INTEGER", "List", "id", "CASCADE"),
                col_fk("trackId", "INTEGER", "Track", "id", "CASCADE"),
                col("databaseUuid", "TEXT"),
                col("nextEntityId", "INTEGER"),
                col("membershipReference", "INTEGER"),
            ],
            playlist_entity_indices,
        ),
    ];

    if v.has_change_log() {
        tables.push(table(
            "ChangeLog",
            vec![col_pk("id", "INTEGER", 1), col("trackId", "INTEGER")],
            Vec::new(),
        ));
        tables.push(table(
            "Pack",
            vec![
                col_pk("id", "INTEGER", 1),
                col("packId", "TEXT"),
                col("changeLogDatabaseUuid", "TEXT"),
                col("changeLogId", "INTEGER"),
            ],
            Vec::new(),
        ));
    }

    tables
}

fn performance_data_table(v: SchemaVersion) -> TableSpec {
    let booleans = v.boolean_decl_type();
    let mut columns = vec![
        col_pk("id", "INTEGER", 1),
        col("isAnalyzed", booleans),
        col("isRendered", booleans),
        col("trackData", "BLOB"),
        col("highResolutionWaveFormData", "BLOB"),
        col("overviewWaveFormData", "BLOB"),
        col("beatData", "BLOB"),
        col("quickCues", "BLOB"),
        col("loops", "BLOB"),
        col("hasSeratoValues", booleans),
    ];
    if v.has_rekordbox_flag() {
        columns.push(col("hasRekordboxValues", booleans));
    }
    if v.has_traktor_flag() {
        columns.push(col("hasTraktorValues", booleans));
    }

    let mut indices = vec![idx("PerformanceData", "id")];
    if v.at_least(1, 17, 0) {
        indices.push(idx("PerformanceData", "isAnalyzed"));
    }

    table("PerformanceData", columns, indices)
}

/// Expected tables of the music file (`m.db` for v1, `Database2/m.db` for
/// v2), in creation order.
pub(crate) fn music_tables(v: SchemaVersion) -> Vec<TableSpec> {
    let mut tables = vec![
        track_table(v),
        information_table(),
        meta_data_table(),
        meta_data_integer_table(),
    ];

    match v.family() {
        crate::version::SchemaFamily::V1 if !v.uses_list_table() => {
            tables.extend(legacy_list_tables(v));
            tables.push(album_art_table());
            tables.push(copied_track_table());
        }
        crate::version::SchemaFamily::V1 => {
            tables.push(album_art_table());
            tables.push(copied_track_table());
            tables.extend(list_tables_1_18(v));
        }
        crate::version::SchemaFamily::V2 => {
            tables.push(performance_data_table(v));
            tables.push(album_art_table());
            tables.extend(list_tables_v2(v));
        }
    }

    tables
}

/// Expected tables of the v1 performance file (`p.db`), in creation order.
pub(crate) fn performance_tables(v: SchemaVersion) -> Vec<TableSpec> {
    vec![information_table(), performance_data_table(v)]
}
