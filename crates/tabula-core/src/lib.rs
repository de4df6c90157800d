//! Core types and traits for tabula.
//!
//! `tabula-core` is the **foundation layer** of the workspace. It defines the
//! value holders the table accessor works on and the two capabilities it
//! needs from the outside world.
//!
//! # Role In The Architecture
//!
//! - **Value holders**: [`ColumnDescriptor`] keeps one column's metadata with
//!   its current and loaded ("backup") values; [`Row`] is the ordered set of
//!   descriptors for one fetched record.
//! - **Capabilities**: [`QueryExecutor`] is implemented by database drivers,
//!   [`ColumnCipher`] by column encryption backends.
//! - **Exchange types**: [`ResultSet`], [`Record`], [`FieldMeta`], [`ColumnInfo`]
//!   and [`CommandOutcome`] carry data between a driver and the accessor.
//!
//! # Who Uses This Crate
//!
//! - `tabula-table` builds `TableAccessor` and `ListCursor` on these types.
//! - `tabula-sqlite` implements [`QueryExecutor`].
//! - `tabula-cipher` implements [`ColumnCipher`].
//!
//! Most applications should use the `tabula` facade; reach for `tabula-core`
//! directly when writing a driver or a cipher.

pub mod cipher;
pub mod column;
pub mod config;
pub mod error;
pub mod executor;
pub mod identifiers;
pub mod record;
pub mod row;
pub mod types;
pub mod value;

pub use cipher::{ColumnCipher, KeySelector};
pub use column::ColumnDescriptor;
pub use config::{CompositeKeyPolicy, DEFAULT_MAX_COLUMNS, TableConfig};
pub use error::{
    CipherError, CipherErrorKind, ColumnRef, ConversionError, Error, IntrospectionError,
    PrimaryKeyError, PrimaryKeyErrorKind, QueryError, QueryErrorKind, Result,
};
pub use executor::QueryExecutor;
pub use identifiers::{is_plain_identifier, quote_ident, quote_ident_mysql, validate_identifier};
pub use record::{ColumnInfo, CommandOutcome, FieldMeta, Record, ResultSet};
pub use row::{ColumnKey, Row};
pub use types::DataType;
pub use value::{IntoColumnValue, ValueError};
