use std::path::Path;

use rusqlite::{Connection, OpenFlags, Params, Row};
use tracing::{debug, error};

use crate::error::{DbError, DbResult};

/// Thin query executor over one SQLite connection. The reader databases ship
/// pre-populated, so the file is opened read-write but never created.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open an existing database file. A missing file is reported as an error
    /// instead of silently producing an empty database.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|source| {
            error!(path = %path.display(), %source, "failed to open database");
            DbError::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!(path = %path.display(), "opened database");
        Ok(Self { conn })
    }

    /// Wrap an already-open connection. Used by fixtures that build the schema
    /// in memory.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DbError::Open {
            path: ":memory:".into(),
            source,
        })?;
        Ok(Self { conn })
    }

    /// Run a SELECT and map every row.
    pub fn fetch<T, P, F>(&self, sql: &str, params: P, map: F) -> DbResult<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.prepare(sql)?;
        let rows = stmt
            .query_map(params, map)
            .map_err(|err| self.fail(sql, err))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| self.fail(sql, err))?;
        Ok(rows)
    }

    /// Run a SELECT and map the first row. An empty result is `NotFound`.
    pub fn fetch_one<T, P, F>(&self, sql: &str, params: P, map: F) -> DbResult<T>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.prepare(sql)?;
        match stmt.query_row(params, map) {
            Ok(value) => Ok(value),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                debug!(query = sql, "query returned no rows");
                Err(DbError::NotFound {
                    query: sql.to_string(),
                })
            }
            Err(err) => Err(self.fail(sql, err)),
        }
    }

    /// Run a data-modifying statement and return the number of changed rows.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> DbResult<usize> {
        self.conn
            .execute(sql, params)
            .map_err(|err| self.fail(sql, err))
    }

    /// Borrow the raw connection, mostly for test fixtures.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn prepare(&self, sql: &str) -> DbResult<rusqlite::CachedStatement<'_>> {
        self.conn
            .prepare_cached(sql)
            .map_err(|err| self.fail(sql, err))
    }

    fn fail(&self, sql: &str, err: rusqlite::Error) -> DbError {
        error!(query = sql, error = %err, "query failed");
        DbError::query(sql, err)
    }
}

/// Quote a table name read from the database so it can be interpolated into
/// SQL. Text table names such as `ic_quranic_text-en` contain dashes.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
