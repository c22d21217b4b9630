//! SqliteAdapter: storage adapter backed by SQLite
//!
//! Each column is a table `(id INTEGER PRIMARY KEY, value TEXT NOT NULL)`
//! created on first use. Compiled expressions become
//! `json_extract("value", '$.path') op ?1` with the literal bound as a
//! parameter, so filtering runs inside SQLite on the stored text.
//!
//! The connection sits behind a `parking_lot::Mutex`; calls are serialized.

use parking_lot::Mutex;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tessera_core::{
    validate_identifier, EncodedForm, Error, ExtractionExpression, Primitive, Result, RowHandle,
    StorageAdapter,
};
use tracing::{debug, info};

/// Column holding the encoded text in every table
const VALUE_COLUMN: &str = "value";

/// SQLite-backed storage adapter
pub struct SqliteAdapter {
    conn: Mutex<Connection>,
}

impl SqliteAdapter {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(sql_error)?;
        info!(target: "tessera::storage", path = ?path, "Opened SQLite adapter");
        Ok(Self::from_connection(conn))
    }

    /// Private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_connection(Connection::open_in_memory().map_err(sql_error)?))
    }

    /// Wrap an existing connection
    pub fn from_connection(conn: Connection) -> Self {
        SqliteAdapter {
            conn: Mutex::new(conn),
        }
    }

    /// Ensure the table for `column` exists, returning its quoted name
    fn table(conn: &Connection, column: &str) -> Result<String> {
        validate_identifier(column)
            .map_err(|e| Error::storage(format!("invalid column name '{}': {}", column, e)))?;
        let table = format!("\"{}\"", column);
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY, {} TEXT NOT NULL)",
                table, VALUE_COLUMN
            ),
            [],
        )
        .map_err(sql_error)?;
        Ok(table)
    }
}

impl std::fmt::Debug for SqliteAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteAdapter").finish_non_exhaustive()
    }
}

fn sql_error(e: rusqlite::Error) -> Error {
    Error::storage(format!("sqlite: {}", e))
}

fn handle_from_id(id: i64) -> Result<RowHandle> {
    u64::try_from(id)
        .map(RowHandle::new)
        .map_err(|_| Error::storage(format!("sqlite returned negative row id {}", id)))
}

fn bind_literal(literal: &Primitive) -> SqlValue {
    match literal {
        Primitive::Int(i) => SqlValue::Integer(*i),
        Primitive::Float(f) => SqlValue::Real(*f),
        Primitive::Text(s) => SqlValue::Text(s.clone()),
        // json_extract yields 1/0 for true/false
        Primitive::Bool(b) => SqlValue::Integer(i64::from(*b)),
    }
}

impl StorageAdapter for SqliteAdapter {
    type Matches<'a> = std::vec::IntoIter<RowHandle>;

    fn store(&self, column: &str, encoded: &EncodedForm) -> Result<RowHandle> {
        let conn = self.conn.lock();
        let table = Self::table(&conn, column)?;
        conn.execute(
            &format!("INSERT INTO {} ({}) VALUES (?1)", table, VALUE_COLUMN),
            params![encoded.as_str()],
        )
        .map_err(sql_error)?;
        handle_from_id(conn.last_insert_rowid())
    }

    fn fetch(&self, column: &str, handle: RowHandle) -> Result<EncodedForm> {
        let conn = self.conn.lock();
        let table = Self::table(&conn, column)?;
        let id = i64::try_from(handle.as_u64()).map_err(|_| Error::NotFound {
            column: column.to_string(),
            handle,
        })?;
        conn.query_row(
            &format!("SELECT {} FROM {} WHERE id = ?1", VALUE_COLUMN, table),
            params![id],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(sql_error)?
        .map(EncodedForm::from_stored)
        .ok_or_else(|| Error::NotFound {
            column: column.to_string(),
            handle,
        })
    }

    fn evaluate<'a>(&'a self, column: &str, expr: &ExtractionExpression) -> Result<Self::Matches<'a>> {
        let conn = self.conn.lock();
        let table = Self::table(&conn, column)?;
        let sql = format!(
            "SELECT id FROM {} WHERE {} ORDER BY id",
            table,
            expr.to_sql(VALUE_COLUMN)
        );
        debug!(target: "tessera::storage", %sql, "Evaluating pushdown");

        let mut stmt = conn.prepare(&sql).map_err(|e| match e {
            rusqlite::Error::SqliteFailure(_, Some(ref msg)) if msg.contains("no such function") => {
                Error::PushdownUnsupported(format!("sqlite: {}", msg))
            }
            other => sql_error(other),
        })?;
        let ids = stmt
            .query_map(params![bind_literal(expr.literal())], |row| row.get::<_, i64>(0))
            .map_err(sql_error)?
            .collect::<std::result::Result<Vec<i64>, _>>()
            .map_err(sql_error)?;

        ids.into_iter()
            .map(handle_from_id)
            .collect::<Result<Vec<_>>>()
            .map(Vec::into_iter)
    }

    fn scan(&self, column: &str) -> Result<Vec<(RowHandle, EncodedForm)>> {
        let conn = self.conn.lock();
        let table = Self::table(&conn, column)?;
        let mut stmt = conn
            .prepare(&format!("SELECT id, {} FROM {} ORDER BY id", VALUE_COLUMN, table))
            .map_err(sql_error)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))
            .map_err(sql_error)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(sql_error)?;

        rows.into_iter()
            .map(|(id, text)| Ok((handle_from_id(id)?, EncodedForm::from_stored(text))))
            .collect()
    }
}
