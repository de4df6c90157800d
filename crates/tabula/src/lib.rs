//! Tabula: schema-introspecting access to one database table at a time.
//!
//! A [`TableAccessor`] binds to a table by name, discovers its columns and
//! primary key from the driver, and keeps a single working row with
//! per-column change tracking so that updates write only what changed.
//! Columns can be flagged for transparent encryption through a
//! [`ColumnCipher`] such as [`Keyring`]. A [`ListCursor`] walks the rows that
//! match a filter in both directions while caching only their keys.
//!
//! The database itself sits behind the [`QueryExecutor`] trait. The `sqlite`
//! feature provides [`SqliteExecutor`] over an embedded SQLite database.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tabula::prelude::*;
//!
//! let db = SqliteExecutor::open("shop.db")?;
//! let keys = Keyring::with_shared(Key::from_passphrase("hunter2", b"shop salt")?);
//!
//! let mut customers = TableAccessor::new(&db, "Customers")?.with_cipher(Arc::new(keys));
//! customers.set_encrypted_column("CardNumber", KeySelector::Shared)?;
//!
//! customers.clear_data()?;
//! customers.set_value("Name", "Ada")?;
//! customers.set_value("CardNumber", "4111 1111 1111 1111")?;
//! let id = customers.ins(true)?;
//!
//! let mut list = ListCursor::new(customers);
//! list.get_list("order by Name")?;
//! let mut current = list.first()?;
//! while let Some(id) = current {
//!     println!("{id}: {:?}", list.accessor().get_str("Name", false)?);
//!     current = list.next()?;
//! }
//! ```

pub use tabula_core::{
    CipherError, CipherErrorKind, ColumnCipher, ColumnDescriptor, ColumnInfo, ColumnKey,
    ColumnRef, CommandOutcome, CompositeKeyPolicy, ConversionError, DEFAULT_MAX_COLUMNS,
    DataType, Error, FieldMeta, IntoColumnValue, IntrospectionError, KeySelector,
    PrimaryKeyError, PrimaryKeyErrorKind, QueryError, QueryErrorKind, QueryExecutor, Record,
    Result, ResultSet, Row, TableConfig, ValueError,
};
pub use tabula_table::{
    CursorPosition, Hook, HookEvent, HookKind, Hooks, ListCursor, PrimaryKey, TableAccessor,
    TableSchema,
};
pub use tabula_cipher::{Key, Keyring};

#[cfg(feature = "sqlite")]
pub use tabula_sqlite::SqliteExecutor;

/// Statement templating used by the accessor, for executors that want to
/// check what they will be asked to run.
pub mod sql {
    pub use tabula_table::sql::*;
}

pub mod prelude {
    pub use crate::{
        ColumnCipher, CursorPosition, DataType, Error, HookEvent, HookKind, Key, KeySelector,
        Keyring, ListCursor, QueryExecutor, Result, Row, TableAccessor, TableConfig,
    };

    #[cfg(feature = "sqlite")]
    pub use crate::SqliteExecutor;
}
