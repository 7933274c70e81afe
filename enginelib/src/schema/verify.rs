//! Schema validation by introspection: the live database's tables,
//! columns and indexes are compared entry-by-entry against the expected
//! specs. Entries are compared in name order; any missing, extra or
//! differing entry fails with a detail naming the offender. Triggers and
//! views are created but deliberately not verified.

use rusqlite::Connection;

use super::spec::{self, IndexSpec, TableSpec};
use crate::error::Error;
use crate::version::{SchemaFamily, SchemaVersion};
use crate::Result;

#[derive(Debug)]
struct ActualColumn {
    name: String,
    decl_type: String,
    notnull: bool,
    default: Option<String>,
    pk: i64,
}

#[derive(Debug)]
struct ActualIndex {
    name: String,
    unique: bool,
    origin: String,
    partial: bool,
}

fn table_names(conn: &Connection, schema: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT name FROM \"{schema}\".sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
    ))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names)
}

fn column_info(conn: &Connection, schema: &str, table: &str) -> Result<Vec<ActualColumn>> {
    let mut stmt = conn.prepare(&format!("PRAGMA \"{schema}\".table_info('{table}')"))?;
    let mut columns = stmt
        .query_map([], |row| {
            Ok(ActualColumn {
                name: row.get(1)?,
                decl_type: row.get(2)?,
                notnull: row.get::<_, i64>(3)? != 0,
                default: row.get(4)?,
                pk: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    columns.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(columns)
}

fn index_list(conn: &Connection, schema: &str, table: &str) -> Result<Vec<ActualIndex>> {
    let mut stmt = conn.prepare(&format!("PRAGMA \"{schema}\".index_list('{table}')"))?;
    let mut indices = stmt
        .query_map([], |row| {
            Ok(ActualIndex {
                name: row.get(1)?,
                unique: row.get::<_, i64>(2)? != 0,
                origin: row.get(3)?,
                partial: row.get::<_, i64>(4)? != 0,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    indices.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(indices)
}

fn index_columns(conn: &Connection, schema: &str, index: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA \"{schema}\".index_info('{index}')"))?;
    let mut columns = stmt
        .query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(2)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    columns.sort_by_key(|(rank, _)| *rank);
    Ok(columns.into_iter().map(|(_, name)| name).collect())
}

fn verify_columns(conn: &Connection, schema: &str, table: &TableSpec) -> Result<()> {
    let actual = column_info(conn, schema, table.name)?;
    let mut expected: Vec<_> = table.columns.iter().collect();
    expected.sort_by_key(|c| c.name);

    let mut actual_iter = actual.iter();
    for exp in expected {
        let act = actual_iter.next().ok_or_else(|| {
            Error::schema_mismatch(format!(
                "column {} missing from table {}.{}",
                exp.name, schema, table.name
            ))
        })?;
        if act.name != exp.name {
            return Err(Error::schema_mismatch(format!(
                "column {} in table {}.{} out of order, expected {}",
                act.name, schema, table.name, exp.name
            )));
        }
        if act.decl_type != exp.decl_type {
            return Err(Error::schema_mismatch(format!(
                "column {}.{}.{} has wrong type: {}",
                schema, table.name, exp.name, act.decl_type
            )));
        }
        if act.notnull != exp.notnull {
            return Err(Error::schema_mismatch(format!(
                "column {}.{}.{} has wrong nullability",
                schema, table.name, exp.name
            )));
        }
        if act.default.as_deref() != exp.default {
            return Err(Error::schema_mismatch(format!(
                "column {}.{}.{} has wrong default value: {:?}",
                schema, table.name, exp.name, act.default
            )));
        }
        if act.pk != exp.pk {
            return Err(Error::schema_mismatch(format!(
                "column {}.{}.{} has wrong primary-key membership: {}",
                schema, table.name, exp.name, act.pk
            )));
        }
    }
    if let Some(act) = actual_iter.next() {
        return Err(Error::schema_mismatch(format!(
            "unexpected column {} in table {}.{}",
            act.name, schema, table.name
        )));
    }
    Ok(())
}

fn verify_index(
    conn: &Connection,
    schema: &str,
    table: &TableSpec,
    exp: &IndexSpec,
    act: &ActualIndex,
) -> Result<()> {
    if act.name != exp.name {
        return Err(Error::schema_mismatch(format!(
            "index {} on table {}.{} out of order, expected {}",
            act.name, schema, table.name, exp.name
        )));
    }
    if act.unique != exp.unique {
        return Err(Error::schema_mismatch(format!(
            "index {}.{} has wrong uniqueness",
            schema, exp.name
        )));
    }
    if act.origin != exp.origin {
        return Err(Error::schema_mismatch(format!(
            "index {}.{} has wrong creation method: {}",
            schema, exp.name, act.origin
        )));
    }
    if act.partial {
        return Err(Error::schema_mismatch(format!(
            "index {}.{} is unexpectedly partial",
            schema, exp.name
        )));
    }

    let actual_columns = index_columns(conn, schema, &exp.name)?;
    if actual_columns != exp.columns {
        return Err(Error::schema_mismatch(format!(
            "index {}.{} covers wrong columns: {:?}",
            schema, exp.name, actual_columns
        )));
    }
    Ok(())
}

fn verify_indices(conn: &Connection, schema: &str, table: &TableSpec) -> Result<()> {
    let actual = index_list(conn, schema, table.name)?;
    let mut expected: Vec<_> = table.indices.iter().collect();
    expected.sort_by(|a, b| a.name.cmp(&b.name));

    let mut actual_iter = actual.iter();
    for exp in expected {
        let act = actual_iter.next().ok_or_else(|| {
            Error::schema_mismatch(format!(
                "index {} missing on table {}.{}",
                exp.name, schema, table.name
            ))
        })?;
        verify_index(conn, schema, table, exp, act)?;
    }
    if let Some(act) = actual_iter.next() {
        return Err(Error::schema_mismatch(format!(
            "unexpected index {} on table {}.{}",
            act.name, schema, table.name
        )));
    }
    Ok(())
}

fn verify_file(conn: &Connection, schema: &str, tables: &[TableSpec]) -> Result<()> {
    let actual = table_names(conn, schema)?;
    let mut expected: Vec<&str> = tables.iter().map(|t| t.name).collect();
    expected.sort_unstable();

    for name in &expected {
        if !actual.iter().any(|a| a == name) {
            return Err(Error::schema_mismatch(format!(
                "table {schema}.{name} is missing"
            )));
        }
    }
    for name in &actual {
        if !expected.contains(&name.as_str()) {
            return Err(Error::schema_mismatch(format!(
                "unexpected table {schema}.{name}"
            )));
        }
    }

    for table in tables {
        verify_columns(conn, schema, table)?;
        verify_indices(conn, schema, table)?;
    }
    Ok(())
}

/// Validates a live database against the expectations for `version`.
pub(crate) fn verify_schema(conn: &Connection, version: SchemaVersion) -> Result<()> {
    match version.family() {
        SchemaFamily::V1 => {
            verify_file(conn, "music", &spec::music_tables(version))?;
            verify_file(conn, "perfdata", &spec::performance_tables(version))?;
        }
        SchemaFamily::V2 => {
            verify_file(conn, "main", &spec::music_tables(version))?;
        }
    }
    Ok(())
}
