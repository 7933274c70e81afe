//! The crate tree: hierarchical, unordered containers of tracks.
//!
//! Crates live at root level or under another crate, and the hierarchy is
//! stored redundantly in three places:
//!
//! * `Crate` (id, title, path) — `path` is the semicolon-delimited
//!   concatenation of titles from the root to the crate, with a trailing
//!   semicolon. Semicolons are therefore prohibited in crate names.
//! * `CrateParentList` — every crate has exactly one immediate parent; a
//!   root crate has itself as parent.
//! * `CrateHierarchy` — the flattened closure of the hierarchy: one row
//!   per (ancestor, descendant) pair, excluding the reflexive pair.
//!
//! On schemas from 1.18.0 these names are views over the generic list
//! tables, maintained by `INSTEAD OF` triggers, and new ids must be
//! allocated by hand.

use std::rc::Rc;

use rusqlite::{params, OptionalExtension};

use super::storage::Storage;
use super::transaction::TransactionScope;
use crate::error::Error;
use crate::Result;

fn ensure_valid_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(';') {
        return Err(Error::CrateInvalidName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

pub(crate) fn exists(storage: &Storage, id: i64) -> Result<bool> {
    let count: i64 = storage
        .conn
        .query_row("SELECT COUNT(*) FROM Crate WHERE id = ?", [id], |row| {
            row.get(0)
        })?;
    if count > 1 {
        return Err(Error::inconsistency_for(
            "more than one crate with the same id",
            id,
        ));
    }
    Ok(count == 1)
}

pub(crate) fn name(storage: &Storage, id: i64) -> Result<String> {
    storage
        .conn
        .query_row("SELECT title FROM Crate WHERE id = ?", [id], |row| {
            row.get(0)
        })
        .optional()?
        .ok_or(Error::CrateDeleted { id })
}

pub(crate) fn path(storage: &Storage, id: i64) -> Result<String> {
    storage
        .conn
        .query_row("SELECT path FROM Crate WHERE id = ?", [id], |row| {
            row.get(0)
        })
        .optional()?
        .ok_or(Error::CrateDeleted { id })
}

/// The immediate parent, or `None` for a root crate (which is recorded
/// as its own parent).
pub(crate) fn parent_id(storage: &Storage, id: i64) -> Result<Option<i64>> {
    let parent = storage
        .conn
        .query_row(
            "SELECT crateParentId FROM CrateParentList \
             WHERE crateOriginId = ? AND crateParentId <> crateOriginId",
            [id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(parent)
}

/// Immediate children, from the parent list.
pub(crate) fn child_ids(storage: &Storage, id: i64) -> Result<Vec<i64>> {
    let mut stmt = storage.conn.prepare(
        "SELECT crateOriginId FROM CrateParentList \
         WHERE crateParentId = ? AND crateOriginId <> crateParentId ORDER BY crateOriginId",
    )?;
    let ids = stmt
        .query_map([id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// All descendants, from the closure table.
pub(crate) fn descendant_ids(storage: &Storage, id: i64) -> Result<Vec<i64>> {
    let mut stmt = storage.conn.prepare(
        "SELECT crateIdChild FROM CrateHierarchy WHERE crateId = ? ORDER BY crateIdChild",
    )?;
    let ids = stmt
        .query_map([id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub(crate) fn all_ids(storage: &Storage) -> Result<Vec<i64>> {
    let mut stmt = storage.conn.prepare("SELECT id FROM Crate ORDER BY id")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub(crate) fn ids_by_name(storage: &Storage, name: &str) -> Result<Vec<i64>> {
    let mut stmt = storage
        .conn
        .prepare("SELECT id FROM Crate WHERE title = ? ORDER BY id")?;
    let ids = stmt
        .query_map([name], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub(crate) fn root_ids(storage: &Storage) -> Result<Vec<i64>> {
    let mut stmt = storage.conn.prepare(
        "SELECT crateOriginId FROM CrateParentList \
         WHERE crateParentId = crateOriginId ORDER BY crateOriginId",
    )?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub(crate) fn root_id_by_name(storage: &Storage, name: &str) -> Result<Option<i64>> {
    let id = storage
        .conn
        .query_row(
            "SELECT cr.id FROM Crate cr \
             JOIN CrateParentList cpl ON cpl.crateOriginId = cr.id \
             WHERE cr.title = ? AND cpl.crateOriginId = cpl.crateParentId \
             ORDER BY cr.id",
            [name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

pub(crate) fn sub_crate_id_by_name(
    storage: &Storage,
    parent_id: i64,
    name: &str,
) -> Result<Option<i64>> {
    let id = storage
        .conn
        .query_row(
            "SELECT cr.id FROM Crate cr \
             JOIN CrateParentList cpl ON cpl.crateOriginId = cr.id \
             WHERE cr.title = ? AND cpl.crateParentId = ? \
             AND cpl.crateOriginId <> cpl.crateParentId ORDER BY cr.id",
            params![name, parent_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Inserts the `Crate` row itself and returns the new id. Newer schemas
/// route the insert through a view onto the list table, which has no
/// autoincrement, so the id is determined in advance there.
fn insert_crate_row(storage: &Storage, name: &str, path: &str) -> Result<i64> {
    if storage.version.uses_list_table() {
        let id: i64 = storage
            .conn
            .query_row("SELECT IFNULL(MAX(id), 0) + 1 FROM List", [], |row| {
                row.get(0)
            })?;
        storage.conn.execute(
            "INSERT INTO Crate (id, title, path) VALUES (?, ?, ?)",
            params![id, name, path],
        )?;
        Ok(id)
    } else {
        storage.conn.execute(
            "INSERT INTO Crate (title, path) VALUES (?, ?)",
            params![name, path],
        )?;
        Ok(storage.conn.last_insert_rowid())
    }
}

pub(crate) fn create_root(storage: &Rc<Storage>, name: &str) -> Result<i64> {
    ensure_valid_name(name)?;
    if root_id_by_name(storage, name)?.is_some() {
        return Err(Error::CrateAlreadyExists {
            name: name.to_owned(),
        });
    }

    let scope = TransactionScope::begin(Rc::clone(storage))?;
    let id = insert_crate_row(storage, name, &format!("{name};"))?;
    storage.conn.execute(
        "INSERT INTO CrateParentList (crateOriginId, crateParentId) VALUES (?, ?)",
        params![id, id],
    )?;
    scope.commit()?;
    Ok(id)
}

pub(crate) fn create_sub(storage: &Rc<Storage>, parent_id: i64, name: &str) -> Result<i64> {
    ensure_valid_name(name)?;
    if sub_crate_id_by_name(storage, parent_id, name)?.is_some() {
        return Err(Error::CrateAlreadyExists {
            name: name.to_owned(),
        });
    }

    let scope = TransactionScope::begin(Rc::clone(storage))?;
    let parent_path = path(storage, parent_id)?;

    let id = insert_crate_row(storage, name, &format!("{parent_path}{name};"))?;
    storage.conn.execute(
        "INSERT INTO CrateParentList (crateOriginId, crateParentId) VALUES (?, ?)",
        params![id, parent_id],
    )?;
    // One closure row per ancestor of the parent, plus the parent itself.
    storage.conn.execute(
        "INSERT INTO CrateHierarchy (crateId, crateIdChild) \
         SELECT crateId, ? FROM CrateHierarchy WHERE crateIdChild = ? \
         UNION SELECT ? AS crateId, ? AS crateIdChild",
        params![id, parent_id, parent_id, id],
    )?;
    scope.commit()?;
    Ok(id)
}

fn update_descendant_paths(storage: &Storage, id: i64, path: &str) -> Result<()> {
    for child_id in child_ids(storage, id)? {
        let child_path = format!("{path}{};", name(storage, child_id)?);
        storage.conn.execute(
            "UPDATE Crate SET path = ? WHERE id = ?",
            params![child_path, child_id],
        )?;
        update_descendant_paths(storage, child_id, &child_path)?;
    }
    Ok(())
}

pub(crate) fn rename(storage: &Rc<Storage>, id: i64, new_name: &str) -> Result<()> {
    ensure_valid_name(new_name)?;
    if !exists(storage, id)? {
        return Err(Error::CrateDeleted { id });
    }

    let parent = parent_id(storage, id)?;
    let sibling = match parent {
        Some(parent_id) => sub_crate_id_by_name(storage, parent_id, new_name)?,
        None => root_id_by_name(storage, new_name)?,
    };
    if sibling.is_some() && sibling != Some(id) {
        return Err(Error::CrateAlreadyExists {
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
        "UPDATE Crate SET title = ?, path = ? WHERE id = ?",
        params![new_name, new_path, id],
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
    if !exists(storage, id)? {
        return Err(Error::CrateDeleted { id });
    }
    if let Some(new_parent_id) = new_parent_id {
        if new_parent_id == id {
            return Err(Error::CrateInvalidParent);
        }
        if !exists(storage, new_parent_id)? {
            return Err(Error::CrateDeleted { id: new_parent_id });
        }
        // Re-parenting onto a descendant would create a cycle; the
        // closure table answers that in one lookup.
        let is_descendant: i64 = storage.conn.query_row(
            "SELECT COUNT(*) FROM CrateHierarchy WHERE crateId = ? AND crateIdChild = ?",
            params![id, new_parent_id],
            |row| row.get(0),
        )?;
        if is_descendant > 0 {
            return Err(Error::CrateInvalidParent);
        }
    }

    let crate_name = name(storage, id)?;
    let sibling = match new_parent_id {
        Some(parent_id) => sub_crate_id_by_name(storage, parent_id, &crate_name)?,
        None => root_id_by_name(storage, &crate_name)?,
    };
    if sibling.is_some() && sibling != Some(id) {
        return Err(Error::CrateAlreadyExists { name: crate_name });
    }

    let scope = TransactionScope::begin(Rc::clone(storage))?;

    storage
        .conn
        .execute("DELETE FROM CrateParentList WHERE crateOriginId = ?", [id])?;
    storage.conn.execute(
        "INSERT INTO CrateParentList (crateOriginId, crateParentId) VALUES (?, ?)",
        params![id, new_parent_id.unwrap_or(id)],
    )?;

    storage
        .conn
        .execute("DELETE FROM CrateHierarchy WHERE crateIdChild = ?", [id])?;
    if let Some(new_parent_id) = new_parent_id {
        storage.conn.execute(
            "INSERT INTO CrateHierarchy (crateId, crateIdChild) \
             SELECT crateId, ? FROM CrateHierarchy WHERE crateIdChild = ? \
             UNION SELECT ? AS crateId, ? AS crateIdChild",
            params![id, new_parent_id, new_parent_id, id],
        )?;
    }

    let parent_path = match new_parent_id {
        Some(parent_id) => path(storage, parent_id)?,
        None => String::new(),
    };
    let new_path = format!("{parent_path}{crate_name};");
    storage.conn.execute(
        "UPDATE Crate SET path = ? WHERE id = ?",
        params![new_path, id],
    )?;
    update_descendant_paths(storage, id, &new_path)?;

    scope.commit()?;
    Ok(())
}

pub(crate) fn remove(storage: &Storage, id: i64) -> Result<()> {
    storage.conn.execute("DELETE FROM Crate WHERE id = ?", [id])?;
    Ok(())
}

pub(crate) fn track_ids(storage: &Storage, id: i64) -> Result<Vec<i64>> {
    let mut stmt = storage
        .conn
        .prepare("SELECT trackId FROM CrateTrackList WHERE crateId = ? ORDER BY trackId")?;
    let ids = stmt
        .query_map([id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub(crate) fn crate_ids_containing_track(storage: &Storage, track_id: i64) -> Result<Vec<i64>> {
    let mut stmt = storage
        .conn
        .prepare("SELECT crateId FROM CrateTrackList WHERE trackId = ? ORDER BY crateId")?;
    let ids = stmt
        .query_map([track_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub(crate) fn add_track(storage: &Rc<Storage>, id: i64, track_id: i64) -> Result<()> {
    let scope = TransactionScope::begin(Rc::clone(storage))?;
    storage.conn.execute(
        "DELETE FROM CrateTrackList WHERE crateId = ? AND trackId = ?",
        params![id, track_id],
    )?;
    storage.conn.execute(
        "INSERT INTO CrateTrackList (crateId, trackId) VALUES (?, ?)",
        params![id, track_id],
    )?;
    scope.commit()?;
    Ok(())
}

pub(crate) fn remove_track(storage: &Storage, id: i64, track_id: i64) -> Result<()> {
    storage.conn.execute(
        "DELETE FROM CrateTrackList WHERE crateId = ? AND trackId = ?",
        params![id, track_id],
    )?;
    Ok(())
}

pub(crate) fn clear_tracks(storage: &Storage, id: i64) -> Result<()> {
    storage
        .conn
        .execute("DELETE FROM CrateTrackList WHERE crateId = ?", [id])?;
    Ok(())
}
