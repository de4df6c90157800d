//! Error types for tabula.
//!
//! Every failure the access layer can report is a variant of [`Error`]. The
//! families mirror the places where work can go wrong: the executor session,
//! schema introspection, column addressing, primary-key resolution, value
//! conversion, the column cipher and statement execution.
//!
//! Lookups that simply find nothing (a column name that does not exist in a
//! [`Row`](crate::Row), navigation past the end of a list) are *not* errors and
//! are reported as `None` by the APIs that perform them.

use std::error::Error as StdError;
use std::fmt;

use crate::types::DataType;

/// The primary error type for all tabula operations.
#[derive(Debug)]
pub enum Error {
    /// The query executor has no live session.
    NotConnected,
    /// Schema introspection failed.
    Introspection(IntrospectionError),
    /// A column was addressed by name or ordinal and does not exist.
    ColumnNotFound(ColumnRef),
    /// The operation needs a single resolved primary key and there is none.
    PrimaryKey(PrimaryKeyError),
    /// A value could not be converted into a column's canonical form.
    Conversion(ConversionError),
    /// The column cipher failed to encrypt or decrypt a value.
    Cipher(CipherError),
    /// The executor reported a failure running a query or command.
    Query(QueryError),
    /// A table or column name is not a plain SQL identifier.
    InvalidIdentifier(String),
    /// Configuration could not be loaded or is inconsistent.
    Config(String),
}

/// How a column was addressed when it could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    /// Addressed by exact, case-sensitive name.
    Name(String),
    /// Addressed by 0-based ordinal.
    Ordinal(usize),
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Name(name) => write!(f, "'{}'", name),
            ColumnRef::Ordinal(ordinal) => write!(f, "#{}", ordinal),
        }
    }
}

#[derive(Debug)]
pub struct IntrospectionError {
    pub table: String,
    pub message: String,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyError {
    pub table: String,
    pub kind: PrimaryKeyErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryKeyErrorKind {
    /// The table reports no primary-key column.
    Missing,
    /// The table reports more than one primary-key column.
    Composite(Vec<String>),
    /// The key column exists but the working row holds no usable key value.
    NotLoaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    pub column: String,
    pub data_type: DataType,
    pub value: String,
    pub message: String,
}

#[derive(Debug)]
pub struct CipherError {
    pub kind: CipherErrorKind,
    /// Column being encrypted or decrypted, when known.
    pub column: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherErrorKind {
    /// A column is flagged encrypted but the accessor has no cipher.
    NoCipher,
    /// No key is registered for the requested key selector.
    MissingKey,
    /// Ciphertext is truncated, badly encoded or of an unknown version.
    Corrupt,
    /// Ciphertext failed its integrity check.
    Authentication,
    /// Key material could not be derived or used.
    Key,
}

#[derive(Debug)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub sql: Option<String>,
    pub message: String,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// A row-returning query failed.
    Query,
    /// A write command failed.
    Command,
    /// A result value could not be decoded.
    Decode,
}

impl Error {
    /// Shorthand for a [`PrimaryKeyError`].
    pub fn primary_key(table: impl Into<String>, kind: PrimaryKeyErrorKind) -> Self {
        Error::PrimaryKey(PrimaryKeyError {
            table: table.into(),
            kind,
        })
    }

    /// Shorthand for a [`CipherError`].
    pub fn cipher(kind: CipherErrorKind, message: impl Into<String>) -> Self {
        Error::Cipher(CipherError {
            kind,
            column: None,
            message: message.into(),
        })
    }

    /// Shorthand for a [`QueryError`] without a driver source.
    pub fn query(kind: QueryErrorKind, sql: Option<&str>, message: impl Into<String>) -> Self {
        Error::Query(QueryError {
            kind,
            sql: sql.map(str::to_string),
            message: message.into(),
            source: None,
        })
    }

    /// Whether this error means the executor has no live session.
    pub fn is_not_connected(&self) -> bool {
        matches!(self, Error::NotConnected)
    }

    /// Whether this error is a missing, composite or unloaded primary key.
    pub fn is_primary_key(&self) -> bool {
        matches!(self, Error::PrimaryKey(_))
    }

    /// Whether this error is a column lookup miss.
    pub fn is_column_not_found(&self) -> bool {
        matches!(self, Error::ColumnNotFound(_))
    }

    /// The SQL text that caused this error, if any.
    pub fn sql(&self) -> Option<&str> {
        match self {
            Error::Query(q) => q.sql.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotConnected => write!(f, "not connected"),
            Error::Introspection(e) => write!(f, "{}", e),
            Error::ColumnNotFound(c) => write!(f, "no such column: {}", c),
            Error::PrimaryKey(e) => write!(f, "{}", e),
            Error::Conversion(e) => write!(f, "{}", e),
            Error::Cipher(e) => write!(f, "{}", e),
            Error::Query(e) => write!(f, "{}", e),
            Error::InvalidIdentifier(ident) => write!(f, "invalid SQL identifier: '{}'", ident),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl fmt::Display for IntrospectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "introspection of '{}' failed: {}", self.table, self.message)
    }
}

impl fmt::Display for PrimaryKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PrimaryKeyErrorKind::Missing => {
                write!(f, "table '{}' has no primary key", self.table)
            }
            PrimaryKeyErrorKind::Composite(columns) => write!(
                f,
                "table '{}' has a composite primary key ({}); a single key column is required",
                self.table,
                columns.join(", ")
            ),
            PrimaryKeyErrorKind::NotLoaded => {
                write!(f, "no primary key value loaded for table '{}'", self.table)
            }
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot store '{}' in {} column '{}': {}",
            self.value,
            self.data_type.as_str(),
            self.column,
            self.message
        )
    }
}

impl fmt::Display for CipherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            CipherErrorKind::NoCipher => "no cipher configured",
            CipherErrorKind::MissingKey => "missing key",
            CipherErrorKind::Corrupt => "corrupt ciphertext",
            CipherErrorKind::Authentication => "authentication failed",
            CipherErrorKind::Key => "key error",
        };
        match &self.column {
            Some(column) => write!(f, "cipher error on column '{}': {}: {}", column, kind, self.message),
            None => write!(f, "cipher error: {}: {}", kind, self.message),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            QueryErrorKind::Query => "query failed",
            QueryErrorKind::Command => "command failed",
            QueryErrorKind::Decode => "decode failed",
        };
        match &self.sql {
            Some(sql) => write!(f, "{}: {} (sql: {})", kind, self.message, sql),
            None => write!(f, "{}: {}", kind, self.message),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Introspection(e) => e
                .source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn StdError + 'static)),
            Error::Query(e) => e
                .source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn StdError + 'static)),
            _ => None,
        }
    }
}

impl StdError for IntrospectionError {}
impl StdError for PrimaryKeyError {}
impl StdError for ConversionError {}
impl StdError for CipherError {}
impl StdError for QueryError {}

impl From<ConversionError> for Error {
    fn from(err: ConversionError) -> Self {
        Error::Conversion(err)
    }
}

impl From<CipherError> for Error {
    fn from(err: CipherError) -> Self {
        Error::Cipher(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type alias for tabula operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
