//! SQLite query executor for tabula.
//!
//! [`SqliteExecutor`] wraps a single [`rusqlite::Connection`] and answers the
//! [`QueryExecutor`] capability with text-form values. Column introspection
//! uses `PRAGMA table_info`, so declared types are mapped through SQLite's
//! affinity rules by [`DataType::from_declared`].
//!
//! ```no_run
//! use tabula_sqlite::SqliteExecutor;
//!
//! let db = SqliteExecutor::open_in_memory()?;
//! db.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)")?;
//! # Ok::<(), tabula_core::Error>(())
//! ```

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::string::FromUtf8Error;

use rusqlite::Connection;
use rusqlite::types::ValueRef;
use tabula_core::error::{IntrospectionError, QueryError, QueryErrorKind};
use tabula_core::{
    ColumnInfo, CommandOutcome, DataType, Error, FieldMeta, QueryExecutor, Record, Result,
    ResultSet,
};

/// A [`QueryExecutor`] over one SQLite connection.
///
/// The connection lives behind a `RefCell` so that [`SqliteExecutor::close`]
/// can end the session through a shared reference; after closing, every call
/// fails with [`Error::NotConnected`].
pub struct SqliteExecutor {
    conn: RefCell<Option<Connection>>,
    path: String,
}

impl SqliteExecutor {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn =
            Connection::open(path).map_err(|e| driver_error(QueryErrorKind::Command, None, e))?;
        tracing::info!(path = %path.display(), "Opened SQLite database");
        Ok(Self {
            conn: RefCell::new(Some(conn)),
            path: path.display().to_string(),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| driver_error(QueryErrorKind::Command, None, e))?;
        tracing::debug!("Opened in-memory SQLite database");
        Ok(Self {
            conn: RefCell::new(Some(conn)),
            path: ":memory:".to_string(),
        })
    }

    /// Run several `;`-separated statements, typically schema setup.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(sql)
                .map_err(|e| driver_error(QueryErrorKind::Command, Some(sql), e))
        })
    }

    /// End the session. Closing twice is a no-op.
    pub fn close(&self) -> Result<()> {
        let Some(conn) = self.conn.borrow_mut().take() else {
            return Ok(());
        };
        match conn.close() {
            Ok(()) => {
                tracing::info!(path = %self.path, "Closed SQLite database");
                Ok(())
            }
            Err((conn, e)) => {
                *self.conn.borrow_mut() = Some(conn);
                Err(driver_error(QueryErrorKind::Command, None, e))
            }
        }
    }

    /// Where the database lives, `:memory:` for in-memory databases.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let guard = self.conn.borrow();
        let conn = guard.as_ref().ok_or(Error::NotConnected)?;
        f(conn)
    }
}

impl QueryExecutor for SqliteExecutor {
    fn is_connected(&self) -> bool {
        self.conn.borrow().is_some()
    }

    fn introspect_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let pragma = table_info_pragma(table);
        tracing::debug!(sql = %pragma, "Introspecting table");

        self.with_conn(|conn| {
            let fail = |e| driver_error(QueryErrorKind::Query, Some(pragma.as_str()), e);
            let mut stmt = conn.prepare(&pragma).map_err(fail)?;
            let mut rows = stmt.query(()).map_err(fail)?;

            let mut columns = Vec::new();
            while let Some(row) = rows.next().map_err(fail)? {
                let cid: i64 = row.get(0).map_err(fail)?;
                let name: String = row.get(1).map_err(fail)?;
                let declared: String = row.get(2).map_err(fail)?;
                let not_null: bool = row.get(3).map_err(fail)?;
                let pk: i64 = row.get(5).map_err(fail)?;

                let data_type = DataType::from_declared(&declared);
                let mut info = ColumnInfo::new(name, data_type, cid as usize);
                if pk > 0 {
                    info = info.primary_key();
                } else if not_null {
                    info = info.not_null();
                }
                columns.push(info);
            }

            if columns.is_empty() {
                return Err(Error::Introspection(IntrospectionError {
                    table: table.to_string(),
                    message: "no such table".to_string(),
                    source: None,
                }));
            }
            Ok(columns)
        })
    }

    fn execute_query(&self, sql: &str) -> Result<ResultSet> {
        tracing::debug!(sql = %sql, "Executing query");
        self.with_conn(|conn| {
            let fail = |e| driver_error(QueryErrorKind::Query, Some(sql), e);
            let mut stmt = conn.prepare(sql).map_err(fail)?;
            let names: Vec<String> = stmt
                .column_names()
                .into_iter()
                .map(str::to_string)
                .collect();
            let mut types = vec![DataType::Null; names.len()];

            let mut records = Vec::new();
            let mut rows = stmt.query(()).map_err(fail)?;
            while let Some(row) = rows.next().map_err(fail)? {
                let mut values = Vec::with_capacity(names.len());
                for (i, ty) in types.iter_mut().enumerate() {
                    let value = row
                        .get_ref(i)
                        .map_err(|e| driver_error(QueryErrorKind::Decode, Some(sql), e))?;
                    if *ty == DataType::Null {
                        *ty = value_type(value);
                    }
                    let text = value_text(value).map_err(|_| {
                        Error::query(
                            QueryErrorKind::Decode,
                            Some(sql),
                            format!("column '{}' holds a blob that is not UTF-8 text", names[i]),
                        )
                    })?;
                    values.push(text);
                }
                records.push(Record::new(values));
            }

            let fields = names
                .into_iter()
                .zip(types)
                .map(|(name, ty)| FieldMeta::new(name, ty))
                .collect();
            Ok(ResultSet::new(fields, records))
        })
    }

    fn execute_command(&self, sql: &str) -> Result<CommandOutcome> {
        tracing::debug!(sql = %sql, "Executing command");
        self.with_conn(|conn| {
            let affected = conn
                .execute(sql, ())
                .map_err(|e| driver_error(QueryErrorKind::Command, Some(sql), e))?;
            match insert_target(sql) {
                Some(table) if rowid_key(conn, &table) => Ok(CommandOutcome::inserted(
                    affected as u64,
                    conn.last_insert_rowid(),
                )),
                _ => Ok(CommandOutcome::affected(affected as u64)),
            }
        })
    }
}

impl fmt::Debug for SqliteExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteExecutor")
            .field("path", &self.path)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// `PRAGMA table_info`, schema-qualified when the name carries a `db.` prefix.
fn table_info_pragma(table: &str) -> String {
    match table.split_once('.') {
        Some((schema, name)) => format!(
            "PRAGMA {}.table_info({})",
            tabula_core::quote_ident(schema),
            tabula_core::quote_ident(name)
        ),
        None => format!("PRAGMA table_info({})", tabula_core::quote_ident(table)),
    }
}

fn is_insert(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("insert"))
}

/// Table named by `INSERT [OR ...] INTO <table>`, identifier quotes removed.
fn insert_target(sql: &str) -> Option<String> {
    if !is_insert(sql) {
        return None;
    }
    let mut words = sql.split_whitespace();
    words.find(|w| w.eq_ignore_ascii_case("into"))?;
    let target = words.next()?.split('(').next()?;
    let name = target
        .split('.')
        .map(|part| part.trim_matches(|c| matches!(c, '"' | '`' | '[' | ']')))
        .collect::<Vec<_>>()
        .join(".");
    (!name.is_empty()).then_some(name)
}

/// Whether `table`'s key is the rowid itself: a lone `INTEGER PRIMARY KEY`.
///
/// Only then is `last_insert_rowid` the inserted row's key.
fn rowid_key(conn: &Connection, table: &str) -> bool {
    match key_column_types(conn, table) {
        Ok(types) => matches!(types.as_slice(), [only] if only.eq_ignore_ascii_case("INTEGER")),
        Err(e) => {
            tracing::debug!(table, error = %e, "Could not read key columns, no identity reported");
            false
        }
    }
}

fn key_column_types(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&table_info_pragma(table))?;
    let mut rows = stmt.query(())?;
    let mut types = Vec::new();
    while let Some(row) = rows.next()? {
        let pk: i64 = row.get(5)?;
        if pk > 0 {
            types.push(row.get::<_, String>(2)?);
        }
    }
    Ok(types)
}

fn value_type(value: ValueRef<'_>) -> DataType {
    match value {
        ValueRef::Null => DataType::Null,
        ValueRef::Integer(_) => DataType::BigInt,
        ValueRef::Real(_) => DataType::Double,
        ValueRef::Text(_) => DataType::Text,
        ValueRef::Blob(_) => DataType::Blob,
    }
}

/// Canonical text of a fetched value.
///
/// Blobs are carried as text, so a blob that is not valid UTF-8 cannot be
/// represented and is refused rather than altered.
fn value_text(value: ValueRef<'_>) -> std::result::Result<Option<String>, FromUtf8Error> {
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i.to_string())),
        ValueRef::Real(f) => Ok(Some(f.to_string())),
        ValueRef::Text(bytes) => Ok(Some(String::from_utf8_lossy(bytes).into_owned())),
        ValueRef::Blob(bytes) => String::from_utf8(bytes.to_vec()).map(Some),
    }
}

fn driver_error(kind: QueryErrorKind, sql: Option<&str>, err: rusqlite::Error) -> Error {
    tracing::warn!(error = %err, sql = ?sql, "SQLite call failed");
    Error::Query(QueryError {
        kind,
        sql: sql.map(str::to_string),
        message: err.to_string(),
        source: Some(Box::new(err)),
    })
}
