//! Schema extraction from the SQLite catalog.
//!
//! Builds an ordered description of every user table in the loaded
//! database: column names, primary-key flags, and foreign-key references.
//! The extracted schema is what gets serialized into the translation
//! prompt, so enumeration order follows the catalog exactly.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// A foreign-key reference from a column to its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// The table the key points at.
    pub parent_table: String,
    /// The referenced column in the parent table.
    pub parent_column: String,
}

/// A single column as the catalog describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub is_primary_key: bool,
    /// First foreign key whose child column matches this column, if any.
    /// When several foreign keys reference the same column only the first
    /// catalog entry is kept; the translation prompt format carries at
    /// most one parent per column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKeyRef>,
}

/// A table and its columns, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub table_name: String,
    pub columns: Vec<Column>,
}

/// Extract the schema of every user table.
///
/// Tables come back in `sqlite_master` order, columns in `table_info`
/// order. An empty database yields an empty vector, which is a valid
/// state, not an error. A failing catalog query (e.g. the connection was
/// opened over bytes that are not a database) propagates to the caller.
pub fn extract_schema(conn: &Connection) -> rusqlite::Result<Vec<Table>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let table_names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut tables = Vec::with_capacity(table_names.len());
    for table_name in table_names {
        let columns = extract_columns(conn, &table_name)?;
        tables.push(Table {
            table_name,
            columns,
        });
    }

    Ok(tables)
}

/// A row of `PRAGMA foreign_key_list`, reduced to what the prompt needs.
struct ForeignKeyRow {
    child_column: String,
    parent_table: String,
    parent_column: String,
}

fn extract_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<Column>> {
    // Table-valued pragma functions let us bind the table name instead of
    // splicing it into the statement text.
    let mut fk_stmt = conn.prepare(
        "SELECT \"from\", \"table\", \"to\" FROM pragma_foreign_key_list(?1) ORDER BY id, seq",
    )?;
    let foreign_keys = fk_stmt
        .query_map([table], |row| {
            Ok(ForeignKeyRow {
                child_column: row.get(0)?,
                parent_table: row.get(1)?,
                // `to` is NULL when the key references the parent's primary
                // key implicitly; left empty in that case.
                parent_column: row
                    .get::<_, Option<String>>(2)?
                    .unwrap_or_else(String::new),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut col_stmt =
        conn.prepare("SELECT name, pk FROM pragma_table_info(?1) ORDER BY cid")?;
    let columns = col_stmt
        .query_map([table], |row| {
            let name: String = row.get(0)?;
            // `pk` is the 1-based position within the primary key; only the
            // leading key column is tagged, which is the convention the
            // hosted model was trained on.
            let pk_position: i64 = row.get(1)?;
            let foreign_key = foreign_keys
                .iter()
                .find(|fk| fk.child_column == name)
                .map(|fk| ForeignKeyRef {
                    parent_table: fk.parent_table.clone(),
                    parent_column: fk.parent_column.clone(),
                });
            Ok(Column {
                name,
                is_primary_key: pk_position == 1,
                foreign_key,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(columns)
}
