//! Ordered playlists, available on the v2 family only.
//!
//! A playlist is a `List` row with the playlist type discriminator.
//! Sibling playlists under one parent are ordered through `nextListId`;
//! the tree itself uses the same parent-list/closure conventions as
//! crates. Membership lives in `PlaylistEntity` as a singly-linked list
//! keyed by `nextEntityId`, with zero marking the tail; the schema's
//! triggers keep the chain intact across inserts and deletes.

use std::collections::HashMap;
use std::rc::Rc;

use rusqlite::{params, OptionalExtension};

use super::storage::Storage;
use super::transaction::TransactionScope;
use crate::error::Error;
use crate::schema::LIST_TYPE_PLAYLIST;
use crate::Result;

/// `nextEntityId` of the last entity in a playlist chain, and
/// `nextListId` of the last sibling playlist under one parent.
pub(crate) const PLAYLIST_ENTITY_NO_NEXT_ENTITY_ID: i64 = 0;
pub(crate) const PLAYLIST_NO_NEXT_LIST_ID: i64 = 0;

const DEFAULT_MEMBERSHIP_REFERENCE: i64 = 0;

fn ensure_supported(storage: &Storage) -> Result<()> {
    if !storage.version.supports_playlists() {
        return Err(Error::UnsupportedOperation { what: "playlists" });
    }
    Ok(())
}

fn ensure_valid_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(';') {
        return Err(Error::PlaylistInvalidName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

pub(crate) fn exists(storage: &Storage, id: i64) -> Result<bool> {
    ensure_supported(storage)?;
    let count: i64 = storage.conn.query_row(
        "SELECT COUNT(*) FROM List WHERE id = ? AND type = ?",
        params![id, LIST_TYPE_PLAYLIST],
        |row| row.get(0),
    )?;
    Ok(count == 1)
}

pub(crate) fn name(storage: &Storage, id: i64) -> Result<String> {
    ensure_supported(storage)?;
    storage
        .conn
        .query_row(
            "SELECT title FROM List WHERE id = ? AND type = ?",
            params![id, LIST_TYPE_PLAYLIST],
            |row| row.get(0),
        )
        .optional()?
        .ok_or(Error::PlaylistDeleted { id })
}

pub(crate) fn path(storage: &Storage, id: i64) -> Result<String> {
    ensure_supported(storage)?;
    storage
        .conn
        .query_row(
            "SELECT path FROM List WHERE id = ? AND type = ?",
            params![id, LIST_TYPE_PLAYLIST],
            |row| row.get(0),
        )
        .optional()?
        .ok_or(Error::PlaylistDeleted { id })
}

pub(crate) fn parent_id(storage: &Storage, id: i64) -> Result<Option<i64>> {
    ensure_supported(storage)?;
    let parent = storage
        .conn
        .query_row(
            "SELECT listParentId FROM ListParentList \
             WHERE listOriginId = ? AND listParentId <> listOriginId",
            [id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(parent)
}

/// Immediate children, in sibling order (the `nextListId` chain).
pub(crate) fn child_ids(storage: &Storage, id: i64) -> Result<Vec<i64>> {
    ensure_supported(storage)?;
    let mut stmt = storage.conn.prepare(
        "SELECT l.id, l.nextListId FROM List l \
         JOIN ListParentList p ON p.listOriginId = l.id \
         WHERE l.type = ? AND p.listParentId = ? AND p.listOriginId <> p.listParentId",
    )?;
    let rows = stmt
        .query_map(params![LIST_TYPE_PLAYLIST, id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    chain_order(rows, "playlist sibling")
}

pub(crate) fn root_ids(storage: &Storage) -> Result<Vec<i64>> {
    ensure_supported(storage)?;
    let mut stmt = storage.conn.prepare(
        "SELECT l.id, l.nextListId FROM List l \
         JOIN ListParentList p ON p.listOriginId = l.id \
         WHERE l.type = ? AND p.listOriginId = p.listParentId",
    )?;
    let rows = stmt
        .query_map([LIST_TYPE_PLAYLIST], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    chain_order(rows, "root playlist")
}

pub(crate) fn all_ids(storage: &Storage) -> Result<Vec<i64>> {
    ensure_supported(storage)?;
    let mut stmt = storage
        .conn
        .prepare("SELECT id FROM List WHERE type = ? ORDER BY id")?;
    let ids = stmt
        .query_map([LIST_TYPE_PLAYLIST], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub(crate) fn find_id(storage: &Storage, parent_id: Option<i64>, name: &str) -> Result<Option<i64>> {
    ensure_supported(storage)?;
    let id = match parent_id {
        Some(parent_id) => storage
            .conn
            .query_row(
                "SELECT l.id FROM List l \
                 JOIN ListParentList p ON p.listOriginId = l.id \
                 WHERE l.type = ? AND l.title = ? AND p.listParentId = ? \
                 AND p.listOriginId <> p.listParentId ORDER BY l.id",
                params![LIST_TYPE_PLAYLIST, name, parent_id],
                |row| row.get(0),
            )
            .optional()?,
        None => storage
            .conn
            .query_row(
                "SELECT l.id FROM List l \
                 JOIN ListParentList p ON p.listOriginId = l.id \
                 WHERE l.type = ? AND l.title = ? AND p.listOriginId = p.listParentId \
                 ORDER BY l.id",
                params![LIST_TYPE_PLAYLIST, name],
                |row| row.get(0),
            )
            .optional()?,
    };
    Ok(id)
}

/// Orders `(id, next_id)` pairs into a single chain. A set with no head
/// or with a cycle is reported as an inconsistency.
fn chain_order(rows: Vec<(i64, i64)>, what: &str) -> Result<Vec<i64>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let by_id: HashMap<i64, i64> = rows.iter().copied().collect();
    let head = rows
        .iter()
        .map(|(id, _)| *id)
        .find(|id| !rows.iter().any(|(_, next)| next == id))
        .ok_or_else(|| Error::inconsistency(format!("{what} chain has no head")))?;

    let mut ordered = Vec::with_capacity(rows.len());
    let mut current = Some(head);
    while let Some(id) = current {
        ordered.push(id);
        if ordered.len() > rows.len() {
            return Err(Error::inconsistency(format!("{what} chain has a cycle")));
        }
        current = by_id
            .get(&id)
            .copied()
            .filter(|next| *next != PLAYLIST_ENTITY_NO_NEXT_ENTITY_ID);
    }
    if ordered.len() != rows.len() {
        return Err(Error::inconsistency(format!("{what} chain is broken")));
    }
    Ok(ordered)
}

/// Inserts a playlist row at the tail of its sibling chain and wires the
/// parent/closure rows, all within one savepoint.
fn insert_playlist(storage: &Rc<Storage>, parent_id: Option<i64>, name: &str) -> Result<i64> {
    let scope = TransactionScope::begin(Rc::clone(storage))?;

    let parent_path = match parent_id {
        Some(parent_id) => path(storage, parent_id)?,
        None => String::new(),
    };

    let id: i64 = storage
        .conn
        .query_row("SELECT IFNULL(MAX(id), 0) + 1 FROM List", [], |row| {
            row.get(0)
        })?;

    storage.conn.execute(
        "INSERT INTO List (id, type, title, path, isFolder, trackCount, nextListId, \
         isExplicitlyExported) VALUES (?, ?, ?, ?, 0, 0, ?, 1)",
        params![
            id,
            LIST_TYPE_PLAYLIST,
            name,
            format!("{parent_path}{name};"),
            PLAYLIST_NO_NEXT_LIST_ID,
        ],
    )?;

    // Append to the sibling chain: the previous tail points here now.
    let sibling_filter = match parent_id {
        Some(_) => "p.listOriginId <> p.listParentId AND p.listParentId = ?1",
        None => "p.listOriginId = p.listParentId AND ?1 IS NULL",
    };
    storage.conn.execute(
        &format!(
            "UPDATE List SET nextListId = ?2 WHERE id IN ( \
             SELECT l.id FROM List l JOIN ListParentList p ON p.listOriginId = l.id \
             WHERE l.type = ?3 AND l.id <> ?2 AND l.nextListId = ?4 AND {sibling_filter} )"
        ),
        params![
            parent_id,
            id,
            LIST_TYPE_PLAYLIST,
            PLAYLIST_NO_NEXT_LIST_ID
        ],
    )?;

    storage.conn.execute(
        "INSERT INTO ListParentList (listOriginId, listParentId) VALUES (?, ?)",
        params![id, parent_id.unwrap_or(id)],
    )?;
    if let Some(parent_id) = parent_id {
        storage.conn.execute(
            "INSERT INTO ListHierarchy (listId, listIdChild) \
             SELECT listId, ? FROM ListHierarchy WHERE listIdChild = ? \
             UNION SELECT ? AS listId, ? AS listIdChild",
            params![id, parent_id, parent_id, id],
        )?;
    }

    scope.commit()?;
    Ok(id)
}

pub(crate) fn create_root(storage: &Rc<Storage>, name: &str) -> Result<i64> {
    ensure_supported(storage)?;
    ensure_valid_name(name)?;
    if find_id(storage, None, name)?.is_some() {
        return Err(Error::PlaylistAlreadyExists {
            name: name.to_owned(),
        });
    }
    insert_playlist(storage, None, name)
}

pub(crate) fn create_sub(storage: &Rc<Storage>, parent_id: i64, name: &str) -> Result<i64> {
    ensure_supported(storage)?;
    ensure_valid_name(name)?;
    if !exists(storage, parent_id)? {
        return Err(Error::PlaylistDeleted { id: parent_id });
    }
    if find_id(storage, Some(parent_id), name)?.is_some() {
        return Err(Error::PlaylistAlreadyExists {
            name: name.to_owned(),
        });
    }
    insert_playlist(storage, Some(parent_id), name)
}

fn update_descendant_paths(storage: &Storage, id: i64, path: &str) -> Result<()> {
    for child_id in child_ids(storage, id)? {
        let child_path = format!("{path}{};", name(storage, child_id)?);
        storage.conn.execute(
            "UPDATE List SET path = ? WHERE id = ? AND type = ?",
            params![child_path, child_id, LIST_TYPE_PLAYLIST],
        )?;
        update_descendant_paths(storage, child_id, &child_path)?;
    }
    Ok(())
}

pub(crate) fn rename(storage: &Rc<Storage>, id: i64, new_name: &str) -> Result<()> {
    ensure_supported(storage)?;
    ensure_valid_name(new_name)?;
    if !exists(storage, id)? {
        return Err(Error::PlaylistDeleted { id });
    }

    let parent = parent_id(storage, id)?;
    let sibling = find_id(storage, parent, new_name)?;
    if sibling.is_some() && sibling != Some(id) {
        return Err(Error::PlaylistAlreadyExists {
            name: new_name.to_owned(),
        });
    }

    let scope = TransactionScope::begin(Rc::clone(storage))?;
    let parent_path = match parent {
        Some(parent_id) => path(storage, parent_id)?,
        None => String::new(),
    };
    let new_path = format!("{parent_path}{new_name};");
    storage.conn.execute(
        "UPDATE List SET title = ?, path = ? WHERE id = ? AND type = ?",
        params![new_name, new_path, id, LIST_TYPE_PLAYLIST],
    )?;
    update_descendant_paths(storage, id, &new_path)?;
    scope.commit()?;
    Ok(())
}

pub(crate) fn set_parent(
    storage: &Rc<Storage>,
    id: i64,
    new_parent_id: Option<i64>,
) -> Result<()> {
    ensure_supported(storage)?;
    if !exists(storage, id)? {
        return Err(Error::PlaylistDeleted { id });
    }
    if let Some(new_parent_id) = new_parent_id {
        if new_parent_id == id {
            return Err(Error::PlaylistInvalidParent);
        }
        if !exists(storage, new_parent_id)? {
            return Err(Error::PlaylistDeleted { id: new_parent_id });
        }
        let is_descendant: i64 = storage.conn.query_row(
            "SELECT COUNT(*) FROM ListHierarchy WHERE listId = ? AND listIdChild = ?",
            params![id, new_parent_id],
            |row| row.get(0),
        )?;
        if is_descendant > 0 {
            return Err(Error::PlaylistInvalidParent);
        }
    }

    let list_name = name(storage, id)?;
    let sibling = find_id(storage, new_parent_id, &list_name)?;
    if sibling.is_some() && sibling != Some(id) {
        return Err(Error::PlaylistAlreadyExists { name: list_name });
    }

    let scope = TransactionScope::begin(Rc::clone(storage))?;

    storage
        .conn
        .execute("DELETE FROM ListParentList WHERE listOriginId = ?", [id])?;
    storage.conn.execute(
        "INSERT INTO ListParentList (listOriginId, listParentId) VALUES (?, ?)",
        params![id, new_parent_id.unwrap_or(id)],
    )?;

    storage
        .conn
        .execute("DELETE FROM ListHierarchy WHERE listIdChild = ?", [id])?;
    if let Some(new_parent_id) = new_parent_id {
        storage.conn.execute(
            "INSERT INTO ListHierarchy (listId, listIdChild) \
             SELECT listId, ? FROM ListHierarchy WHERE listIdChild = ? \
             UNION SELECT ? AS listId, ? AS listIdChild",
            params![id, new_parent_id, new_parent_id, id],
        )?;
    }

    let parent_path = match new_parent_id {
        Some(parent_id) => path(storage, parent_id)?,
        None => String::new(),
    };
    let new_path = format!("{parent_path}{list_name};");
    storage.conn.execute(
        "UPDATE List SET path = ? WHERE id = ? AND type = ?",
        params![new_path, id, LIST_TYPE_PLAYLIST],
    )?;
    update_descendant_paths(storage, id, &new_path)?;

    scope.commit()?;
    Ok(())
}

pub(crate) fn remove(storage: &Storage, id: i64) -> Result<()> {
    ensure_supported(storage)?;
    storage.conn.execute(
        "DELETE FROM List WHERE id = ? AND type = ?",
        params![id, LIST_TYPE_PLAYLIST],
    )?;
    Ok(())
}

/// Track ids in playlist order, walking the `nextEntityId` chain.
pub(crate) fn track_ids(storage: &Storage, id: i64) -> Result<Vec<i64>> {
    ensure_supported(storage)?;
    let mut stmt = storage.conn.prepare(
        "SELECT id, trackId, nextEntityId FROM PlaylistEntity WHERE listId = ?",
    )?;
    let rows = stmt
        .query_map([id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let entity_order = chain_order(
        rows.iter().map(|(id, _, next)| (*id, *next)).collect(),
        "playlist entity",
    )?;
    let track_by_entity: HashMap<i64, i64> =
        rows.iter().map(|(id, track, _)| (*id, *track)).collect();
    Ok(entity_order
        .iter()
        .filter_map(|entity| track_by_entity.get(entity).copied())
        .collect())
}

pub(crate) fn add_track_back(storage: &Rc<Storage>, id: i64, track_id: i64) -> Result<()> {
    ensure_supported(storage)?;
    if !exists(storage, id)? {
        return Err(Error::PlaylistDeleted { id });
    }
    storage.conn.execute(
        "INSERT INTO PlaylistEntity (listId, trackId, databaseUuid, nextEntityId, \
         membershipReference) VALUES (?, ?, ?, ?, ?)",
        params![
            id,
            track_id,
            storage.uuid,
            PLAYLIST_ENTITY_NO_NEXT_ENTITY_ID,
            DEFAULT_MEMBERSHIP_REFERENCE,
        ],
    )?;
    Ok(())
}

/// Splices a track in immediately after another: the new entity points at
/// the predecessor's old successor, and the schema trigger repoints the
/// predecessor.
pub(crate) fn add_track_after(
    storage: &Rc<Storage>,
    id: i64,
    track_id: i64,
    after_track_id: i64,
) -> Result<()> {
    ensure_supported(storage)?;
    let after_next: Option<i64> = storage
        .conn
        .query_row(
            "SELECT nextEntityId FROM PlaylistEntity WHERE listId = ? AND trackId = ?",
            params![id, after_track_id],
            |row| row.get(0),
        )
        .optional()?;
    let after_next = after_next.ok_or(Error::PlaylistInvalidParent)?;

    storage.conn.execute(
        "INSERT INTO PlaylistEntity (listId, trackId, databaseUuid, nextEntityId, \
         membershipReference) VALUES (?, ?, ?, ?, ?)",
        params![
            id,
            track_id,
            storage.uuid,
            after_next,
            DEFAULT_MEMBERSHIP_REFERENCE,
        ],
    )?;
    Ok(())
}

pub(crate) fn remove_track(storage: &Storage, id: i64, track_id: i64) -> Result<()> {
    ensure_supported(storage)?;
    storage.conn.execute(
        "DELETE FROM PlaylistEntity WHERE listId = ? AND trackId = ?",
        params![id, track_id],
    )?;
    Ok(())
}

pub(crate) fn clear_tracks(storage: &Storage, id: i64) -> Result<()> {
    ensure_supported(storage)?;
    storage
        .conn
        .execute("DELETE FROM PlaylistEntity WHERE listId = ?", [id])?;
    Ok(())
}
