//! Schema creation: DDL generated from the table specs, plus the views,
//! triggers and seed rows each version requires.

use rusqlite::{params, Connection};
use uuid::Uuid;

use super::spec::{self, ColumnSpec, TableSpec};
use super::{LIST_TYPE_CRATE, LIST_TYPE_HISTORY, LIST_TYPE_PLAYLIST, LIST_TYPE_PREPARE};
use crate::version::{SchemaFamily, SchemaVersion};
use crate::Result;

/// Written to `currentPlayedIndiciator` (sic) on create. The derivation
/// rule used by the reference hardware is unknown; this is the constant
/// observed in the wild. It is never updated afterwards.
pub(crate) const CURRENT_PLAYED_INDICATOR_SEED: i64 = 5100658837829259927;

fn column_ddl(column: &ColumnSpec) -> String {
    let mut ddl = format!("[{}] {}", column.name, column.decl_type);
    if column.notnull {
        ddl.push_str(" NOT NULL");
    }
    if let Some(default) = column.default {
        ddl.push_str(" DEFAULT ");
        ddl.push_str(default);
    }
    if let Some(fk) = column.references {
        ddl.push_str(&format!(
            " REFERENCES {} ( [{}] ) ON DELETE {}",
            fk.table, fk.column, fk.on_delete
        ));
    }
    ddl
}

fn table_ddl(qualifier: &str, table: &TableSpec) -> String {
    let mut parts: Vec<String> = table.columns.iter().map(column_ddl).collect();

    let mut pk_columns: Vec<&ColumnSpec> =
        table.columns.iter().filter(|c| c.pk > 0).collect();
    pk_columns.sort_by_key(|c| c.pk);
    if !pk_columns.is_empty() {
        let names: Vec<String> = pk_columns
            .iter()
            .map(|c| format!("[{}]", c.name))
            .collect();
        parts.push(format!("PRIMARY KEY ( {} )", names.join(", ")));
    }

    parts.extend(table.extra_constraints.iter().map(|c| (*c).to_owned()));

    format!(
        "CREATE TABLE {qualifier}{} ( {} )",
        table.name,
        parts.join(", ")
    )
}

fn create_tables(conn: &Connection, qualifier: &str, tables: &[TableSpec]) -> Result<()> {
    for table in tables {
        conn.execute_batch(&table_ddl(qualifier, table))?;
        for index in &table.indices {
            if index.origin != "c" {
                continue;
            }
            conn.execute_batch(&format!(
                "CREATE INDEX {qualifier}{} ON {} ( {} )",
                index.name,
                table.name,
                index.columns.join(", ")
            ))?;
        }
    }
    Ok(())
}

fn insert_information(
    conn: &Connection,
    qualifier: &str,
    version: SchemaVersion,
    played_indicator: i64,
) -> Result<()> {
    let uuid = Uuid::new_v4().to_string();
    let (major, minor, patch) = version.triple();
    conn.execute(
        &format!(
            "INSERT INTO {qualifier}Information ([uuid], [schemaVersionMajor], \
             [schemaVersionMinor], [schemaVersionPatch], [currentPlayedIndiciator], \
             [lastRekordBoxLibraryImportReadCounter]) VALUES (?, ?, ?, ?, ?, ?)"
        ),
        params![uuid, major, minor, patch, played_indicator, 0],
    )?;
    Ok(())
}

/// Views and `INSTEAD OF` triggers presenting the 1.18.0 `List` machinery
/// under the legacy crate/playlist table names.
fn create_list_views_1_18(conn: &Connection) -> Result<()> {
    let c = LIST_TYPE_CRATE;
    let statements = [
        format!(
            "CREATE VIEW music.Playlist AS SELECT id, title FROM List WHERE type = {LIST_TYPE_PLAYLIST}"
        ),
        format!(
            "CREATE VIEW music.Historylist AS SELECT id, title FROM List WHERE type = {LIST_TYPE_HISTORY}"
        ),
        format!(
            "CREATE VIEW music.Preparelist AS SELECT id, title FROM List WHERE type = {LIST_TYPE_PREPARE}"
        ),
        format!(
            "CREATE VIEW music.Crate AS SELECT id AS id, title AS title, path AS path \
             FROM List WHERE type = {c}"
        ),
        format!(
            "CREATE VIEW music.CrateParentList AS SELECT listOriginId AS crateOriginId, \
             listParentId AS crateParentId FROM ListParentList \
             WHERE listOriginType = {c} AND listParentType = {c}"
        ),
        format!(
            "CREATE VIEW music.CrateHierarchy AS SELECT listId AS crateId, \
             listIdChild AS crateIdChild FROM ListHierarchy \
             WHERE listType = {c} AND listTypeChild = {c}"
        ),
        format!(
            "CREATE VIEW music.CrateTrackList AS SELECT listId AS crateId, \
             trackId AS trackId FROM ListTrackList WHERE listType = {c}"
        ),
        format!(
            "CREATE TRIGGER music.trigger_insert_Crate INSTEAD OF INSERT ON Crate \
             FOR EACH ROW BEGIN \
             INSERT INTO List ( id, type, title, path, isFolder, trackCount, ordering, \
             isExplicitlyExported ) VALUES ( NEW.id, {c}, NEW.title, NEW.path, 0, 0, 0, 1 ); \
             END"
        ),
        format!(
            "CREATE TRIGGER music.trigger_update_Crate INSTEAD OF UPDATE ON Crate \
             FOR EACH ROW BEGIN \
             UPDATE List SET title = NEW.title, path = NEW.path \
             WHERE id = OLD.id AND type = {c}; END"
        ),
        format!(
            "CREATE TRIGGER music.trigger_delete_Crate INSTEAD OF DELETE ON Crate \
             FOR EACH ROW BEGIN \
             DELETE FROM List WHERE id = OLD.id AND type = {c}; END"
        ),
        format!(
            "CREATE TRIGGER music.trigger_insert_CrateParentList INSTEAD OF INSERT ON \
             CrateParentList FOR EACH ROW BEGIN \
             INSERT INTO ListParentList ( listOriginId, listOriginType, listParentId, \
             listParentType ) VALUES ( NEW.crateOriginId, {c}, NEW.crateParentId, {c} ); END"
        ),
        format!(
            "CREATE TRIGGER music.trigger_delete_CrateParentList INSTEAD OF DELETE ON \
             CrateParentList FOR EACH ROW BEGIN \
             DELETE FROM ListParentList WHERE listOriginId = OLD.crateOriginId AND \
             listOriginType = {c} AND listParentId = OLD.crateParentId AND \
             listParentType = {c}; END"
        ),
        format!(
            "CREATE TRIGGER music.trigger_insert_CrateHierarchy INSTEAD OF INSERT ON \
             CrateHierarchy FOR EACH ROW BEGIN \
             INSERT INTO ListHierarchy ( listId, listType, listIdChild, listTypeChild ) \
             VALUES ( NEW.crateId, {c}, NEW.crateIdChild, {c} ); END"
        ),
        format!(
            "CREATE TRIGGER music.trigger_delete_CrateHierarchy INSTEAD OF DELETE ON \
             CrateHierarchy FOR EACH ROW BEGIN \
             DELETE FROM ListHierarchy WHERE listId = OLD.crateId AND listType = {c} AND \
             listIdChild = OLD.crateIdChild AND listTypeChild = {c}; END"
        ),
        format!(
            "CREATE TRIGGER music.trigger_insert_CrateTrackList INSTEAD OF INSERT ON \
             CrateTrackList FOR EACH ROW BEGIN \
             INSERT INTO ListTrackList ( listId, listType, trackId, \
             trackIdInOriginDatabase, databaseUuid, trackNumber ) \
             VALUES ( NEW.crateId, {c}, NEW.trackId, NULL, NULL, NULL ); END"
        ),
        format!(
            "CREATE TRIGGER music.trigger_delete_CrateTrackList INSTEAD OF DELETE ON \
             CrateTrackList FOR EACH ROW BEGIN \
             DELETE FROM ListTrackList WHERE listId = OLD.crateId AND listType = {c} AND \
             trackId = OLD.trackId; END"
        ),
        format!(
            "CREATE TRIGGER music.trigger_insert_Playlist INSTEAD OF INSERT ON Playlist \
             FOR EACH ROW BEGIN \
             INSERT INTO List ( id, type, title, path, isFolder, trackCount, ordering, \
             isExplicitlyExported ) \
             VALUES ( NEW.id, {LIST_TYPE_PLAYLIST}, NEW.title, NEW.title || ';', 0, 0, 0, 1 ); \
             INSERT INTO ListParentList ( listOriginId, listOriginType, listParentId, \
             listParentType ) \
             VALUES ( NEW.id, {LIST_TYPE_PLAYLIST}, NEW.id, {LIST_TYPE_PLAYLIST} ); END"
        ),
        format!(
            "CREATE TRIGGER music.trigger_insert_Historylist INSTEAD OF INSERT ON Historylist \
             FOR EACH ROW BEGIN \
             INSERT INTO List ( id, type, title, path, isFolder, trackCount, ordering, \
             isExplicitlyExported ) \
             VALUES ( NEW.id, {LIST_TYPE_HISTORY}, NEW.title, NEW.title || ';', 0, 0, 0, 1 ); \
             INSERT INTO ListParentList ( listOriginId, listOriginType, listParentId, \
             listParentType ) \
             VALUES ( NEW.id, {LIST_TYPE_HISTORY}, NEW.id, {LIST_TYPE_HISTORY} ); END"
        ),
        format!(
            "CREATE TRIGGER music.trigger_insert_Preparelist INSTEAD OF INSERT ON Preparelist \
             FOR EACH ROW BEGIN \
             INSERT INTO List ( id, type, title, path, isFolder, trackCount, ordering, \
             isExplicitlyExported ) \
             VALUES ( NEW.id, {LIST_TYPE_PREPARE}, NEW.title, NEW.title || ';', 0, 0, 0, 1 ); \
             INSERT INTO ListParentList ( listOriginId, listOriginType, listParentId, \
             listParentType ) \
             VALUES ( NEW.id, {LIST_TYPE_PREPARE}, NEW.id, {LIST_TYPE_PREPARE} ); END"
        ),
    ];
    for statement in &statements {
        conn.execute_batch(statement)?;
    }
    Ok(())
}

/// Views and triggers of the v2 family: the crate views over the shared
/// list tables, the playlist-entity linked-list maintenance, and (on 2.x)
/// the change-log triggers.
fn create_list_views_v2(conn: &Connection, version: SchemaVersion) -> Result<()> {
    let c = LIST_TYPE_CRATE;
    let mut statements = vec![
        format!("CREATE VIEW Crate AS SELECT id, title, path FROM List WHERE type = {c}"),
        format!(
            "CREATE VIEW CrateParentList AS SELECT listOriginId AS crateOriginId, \
             listParentId AS crateParentId FROM ListParentList \
             JOIN List ON List.id = ListParentList.listOriginId WHERE List.type = {c}"
        ),
        format!(
            "CREATE VIEW CrateHierarchy AS SELECT listId AS crateId, \
             listIdChild AS crateIdChild FROM ListHierarchy \
             JOIN List ON List.id = ListHierarchy.listIdChild WHERE List.type = {c}"
        ),
        format!(
            "CREATE VIEW CrateTrackList AS SELECT listId AS crateId, trackId AS trackId \
             FROM ListTrackList JOIN List ON List.id = ListTrackList.listId \
             WHERE List.type = {c}"
        ),
        format!(
            "CREATE TRIGGER trigger_insert_Crate INSTEAD OF INSERT ON Crate \
             FOR EACH ROW BEGIN \
             INSERT INTO List ( id, type, title, path, isFolder, trackCount, nextListId, \
             isExplicitlyExported ) VALUES ( NEW.id, {c}, NEW.title, NEW.path, 0, 0, 0, 1 ); \
             END"
        ),
        format!(
            "CREATE TRIGGER trigger_update_Crate INSTEAD OF UPDATE ON Crate \
             FOR EACH ROW BEGIN \
             UPDATE List SET title = NEW.title, path = NEW.path \
             WHERE id = OLD.id AND type = {c}; END"
        ),
        format!(
            "CREATE TRIGGER trigger_delete_Crate INSTEAD OF DELETE ON Crate \
             FOR EACH ROW BEGIN \
             DELETE FROM List WHERE id = OLD.id AND type = {c}; END"
        ),
        "CREATE TRIGGER trigger_insert_CrateParentList INSTEAD OF INSERT ON CrateParentList \
         FOR EACH ROW BEGIN \
         INSERT INTO ListParentList ( listOriginId, listParentId ) \
         VALUES ( NEW.crateOriginId, NEW.crateParentId ); END"
            .to_owned(),
        "CREATE TRIGGER trigger_delete_CrateParentList INSTEAD OF DELETE ON CrateParentList \
         FOR EACH ROW BEGIN \
         DELETE FROM ListParentList WHERE listOriginId = OLD.crateOriginId AND \
         listParentId = OLD.crateParentId; END"
            .to_owned(),
        "CREATE TRIGGER trigger_insert_CrateHierarchy INSTEAD OF INSERT ON CrateHierarchy \
         FOR EACH ROW BEGIN \
         INSERT INTO ListHierarchy ( listId, listIdChild ) \
         VALUES ( NEW.crateId, NEW.crateIdChild ); END"
            .to_owned(),
        "CREATE TRIGGER trigger_delete_CrateHierarchy INSTEAD OF DELETE ON CrateHierarchy \
         FOR EACH ROW BEGIN \
         DELETE FROM ListHierarchy WHERE listId = OLD.crateId AND \
         listIdChild = OLD.crateIdChild; END"
            .to_owned(),
        "CREATE TRIGGER trigger_insert_CrateTrackList INSTEAD OF INSERT ON CrateTrackList \
         FOR EACH ROW BEGIN \
         INSERT INTO ListTrackList ( listId, trackId, trackIdInOriginDatabase, \
         databaseUuid, trackNumber ) \
         VALUES ( NEW.crateId, NEW.trackId, NULL, NULL, NULL ); END"
            .to_owned(),
        "CREATE TRIGGER trigger_delete_CrateTrackList INSTEAD OF DELETE ON CrateTrackList \
         FOR EACH ROW BEGIN \
         DELETE FROM ListTrackList WHERE listId = OLD.crateId AND trackId = OLD.trackId; \
         END"
            .to_owned(),
        // Linked-list maintenance for ordered playlist membership: an
        // insert points the predecessor at the new row, a delete bridges
        // the gap it leaves.
        "CREATE TRIGGER trigger_after_insert_PlaylistEntity AFTER INSERT ON PlaylistEntity \
         FOR EACH ROW BEGIN \
         UPDATE PlaylistEntity SET nextEntityId = NEW.id \
         WHERE listId = NEW.listId AND id <> NEW.id AND nextEntityId = NEW.nextEntityId; \
         END"
            .to_owned(),
        "CREATE TRIGGER trigger_after_delete_PlaylistEntity AFTER DELETE ON PlaylistEntity \
         FOR EACH ROW BEGIN \
         UPDATE PlaylistEntity SET nextEntityId = OLD.nextEntityId \
         WHERE listId = OLD.listId AND nextEntityId = OLD.id; END"
            .to_owned(),
    ];

    if version.has_change_log() {
        statements.push(
            "CREATE TRIGGER trigger_after_update_Track AFTER UPDATE ON Track \
             FOR EACH ROW BEGIN \
             INSERT INTO ChangeLog ( trackId ) VALUES ( NEW.id ); END"
                .to_owned(),
        );
    }

    for statement in &statements {
        conn.execute_batch(statement)?;
    }
    Ok(())
}

fn seed_music(conn: &Connection, qualifier: &str, version: SchemaVersion) -> Result<()> {
    insert_information(conn, qualifier, version, CURRENT_PLAYED_INDICATOR_SEED)?;

    // Sentinel "no album art" row, default history and prepare lists.
    conn.execute_batch(&format!(
        "INSERT INTO {qualifier}AlbumArt VALUES (1, '', NULL);\n\
         INSERT INTO {qualifier}Historylist VALUES (1, 'History 1');\n\
         INSERT INTO {qualifier}Preparelist VALUES (1, 'Prepare');"
    ))?;
    Ok(())
}

fn seed_v2(conn: &Connection, version: SchemaVersion) -> Result<()> {
    insert_information(conn, "", version, CURRENT_PLAYED_INDICATOR_SEED)?;
    conn.execute_batch(&format!(
        "INSERT INTO AlbumArt VALUES (1, '', NULL);\n\
         INSERT INTO List ( id, type, title, path, isFolder, trackCount, nextListId, \
         isExplicitlyExported ) VALUES (1, {LIST_TYPE_HISTORY}, 'History 1', 'History 1;', 0, 0, 0, 1);\n\
         INSERT INTO ListParentList ( listOriginId, listParentId ) VALUES (1, 1);\n\
         INSERT INTO List ( id, type, title, path, isFolder, trackCount, nextListId, \
         isExplicitlyExported ) VALUES (2, {LIST_TYPE_PREPARE}, 'Prepare', 'Prepare;', 0, 0, 0, 1);\n\
         INSERT INTO ListParentList ( listOriginId, listParentId ) VALUES (2, 2);"
    ))?;
    Ok(())
}

/// Builds a fresh schema of the given version, with seed rows, on an open
/// (and for v1, attached) connection.
pub(crate) fn create_schema(conn: &Connection, version: SchemaVersion) -> Result<()> {
    match version.family() {
        SchemaFamily::V1 => {
            create_tables(conn, "music.", &spec::music_tables(version))?;
            if version.uses_list_table() {
                create_list_views_1_18(conn)?;
            }
            seed_music(conn, "music.", version)?;

            create_tables(conn, "perfdata.", &spec::performance_tables(version))?;
            insert_information(conn, "perfdata.", version, 0)?;
        }
        SchemaFamily::V2 => {
            create_tables(conn, "", &spec::music_tables(version))?;
            create_list_views_v2(conn, version)?;
            seed_v2(conn, version)?;
        }
    }
    Ok(())
}
