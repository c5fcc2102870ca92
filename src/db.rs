//! Embedded SQL engine adapter.
//!
//! Wraps rusqlite behind the two capabilities the workbench needs: load a
//! binary SQLite image uploaded by the user, and execute SQL text returning
//! declared column names plus row tuples. The image is spilled to a
//! session-scoped temp file (removed on drop) because SQLite opens files,
//! not byte slices.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use thiserror::Error;

use crate::schema::{self, Table};

/// The 16-byte header every SQLite database file starts with.
const SQLITE_MAGIC: &[u8] = b"SQLite format 3\0";

/// Result type for engine adapter operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors raised at the engine boundary.
#[derive(Debug, Error)]
pub enum DbError {
    /// The uploaded bytes are not a SQLite database image.
    #[error("the uploaded file is not a SQLite database")]
    NotADatabase,

    /// Failed to spill the image to the session temp file.
    #[error("failed to stage database file: {0}")]
    Io(#[from] std::io::Error),

    /// The engine rejected the image or a statement.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// One cell of an engine result row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<ValueRef<'_>> for CellValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => CellValue::Null,
            ValueRef::Integer(i) => CellValue::Integer(i),
            ValueRef::Real(r) => CellValue::Real(r),
            ValueRef::Text(t) => CellValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => CellValue::Blob(b.to_vec()),
        }
    }
}

/// A result set as the engine returns it: declared columns plus tuples,
/// both in engine order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A database loaded for the current session.
#[derive(Debug)]
pub struct LoadedDatabase {
    /// Identifier derived from the uploaded file name, extension stripped.
    database_id: String,
    conn: Connection,
    /// Temp file backing the connection; unlinked when the session drops it.
    temp_path: PathBuf,
}

impl LoadedDatabase {
    /// Load a database from the raw bytes of an uploaded file.
    ///
    /// The image is validated twice: the SQLite magic header up front, and
    /// a catalog query after opening, so that truncated or corrupt files
    /// fail here rather than on the first user action. On failure no state
    /// is retained and the temp file is cleaned up.
    pub fn load(filename: &str, bytes: &[u8]) -> DbResult<Self> {
        if !bytes.starts_with(SQLITE_MAGIC) {
            return Err(DbError::NotADatabase);
        }

        let database_id = database_id_from_filename(filename);
        let temp_path =
            std::env::temp_dir().join(format!("nlsql-{}.sqlite", uuid::Uuid::new_v4()));
        fs::write(&temp_path, bytes)?;

        let db = match Connection::open(&temp_path) {
            Ok(conn) => Self {
                database_id,
                conn,
                temp_path: temp_path.clone(),
            },
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                return Err(DbError::Sqlite(e));
            }
        };

        // SQLite leaves foreign key enforcement off by default; turn it on
        // so DML against the loaded database respects declared keys.
        db.conn.pragma_update(None, "foreign_keys", true)?;

        // A catalog probe surfaces corrupt images as a load error instead
        // of a confusing failure on the first translation.
        db.schema()?;

        Ok(db)
    }

    /// Open an existing database file in place (CLI usage).
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = fs::read(path)?;
        Self::load(&filename, &bytes)
    }

    /// Identifier for this database, used as the prompt's `db_id`.
    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    /// Extract the current schema from the catalog.
    ///
    /// Called fresh on every translation request so the prompt always
    /// reflects the loaded image.
    pub fn schema(&self) -> DbResult<Vec<Table>> {
        Ok(schema::extract_schema(&self.conn)?)
    }

    /// Execute SQL text, returning declared columns and row tuples.
    pub fn execute(&self, sql: &str) -> rusqlite::Result<ResultSet> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let column_count = columns.len();
        let mut rows = Vec::new();
        let mut raw_rows = stmt.query([])?;
        while let Some(row) = raw_rows.next()? {
            let mut tuple = Vec::with_capacity(column_count);
            for i in 0..column_count {
                tuple.push(CellValue::from(row.get_ref(i)?));
            }
            rows.push(tuple);
        }

        Ok(ResultSet { columns, rows })
    }
}

impl Drop for LoadedDatabase {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.temp_path);
    }
}

/// Strip the extension from an uploaded file name to form the database id.
fn database_id_from_filename(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}
