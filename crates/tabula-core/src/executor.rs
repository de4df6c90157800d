//! The query-executor capability.
//!
//! Everything tabula needs from a database driver: column introspection,
//! row-returning queries, write commands and string escaping. Calls block
//! until the driver answers; there is no cancellation or retry at this layer.
//!
//! Methods take `&self` so one executor can serve several accessors when the
//! driver supports concurrent command issuance; implementations that need
//! mutable session state keep it behind interior mutability.

use std::rc::Rc;
use std::sync::Arc;

use crate::error::Result;
use crate::record::{ColumnInfo, CommandOutcome, ResultSet};

pub trait QueryExecutor {
    /// Whether a live session is available.
    fn is_connected(&self) -> bool {
        true
    }

    /// Describe the columns of `table` in ordinal order.
    ///
    /// An unknown table is an error, not an empty list.
    fn introspect_columns(&self, table: &str) -> Result<Vec<ColumnInfo>>;

    /// Run a row-returning statement.
    fn execute_query(&self, sql: &str) -> Result<ResultSet>;

    /// Run a write statement.
    fn execute_command(&self, sql: &str) -> Result<CommandOutcome>;

    /// Make `text` safe to embed inside a single-quoted SQL literal.
    fn escape(&self, text: &str) -> String {
        text.replace('\'', "''")
    }

    /// Quote an identifier for this dialect (ANSI double quotes by default).
    fn quote_identifier(&self, ident: &str) -> String {
        crate::identifiers::quote_ident(ident)
    }
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn introspect_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        (**self).introspect_columns(table)
    }

    fn execute_query(&self, sql: &str) -> Result<ResultSet> {
        (**self).execute_query(sql)
    }

    fn execute_command(&self, sql: &str) -> Result<CommandOutcome> {
        (**self).execute_command(sql)
    }

    fn escape(&self, text: &str) -> String {
        (**self).escape(text)
    }

    fn quote_identifier(&self, ident: &str) -> String {
        (**self).quote_identifier(ident)
    }
}

macro_rules! forward_executor {
    ($ptr:ident) => {
        impl<E: QueryExecutor + ?Sized> QueryExecutor for $ptr<E> {
            fn is_connected(&self) -> bool {
                (**self).is_connected()
            }

            fn introspect_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
                (**self).introspect_columns(table)
            }

            fn execute_query(&self, sql: &str) -> Result<ResultSet> {
                (**self).execute_query(sql)
            }

            fn execute_command(&self, sql: &str) -> Result<CommandOutcome> {
                (**self).execute_command(sql)
            }

            fn escape(&self, text: &str) -> String {
                (**self).escape(text)
            }

            fn quote_identifier(&self, ident: &str) -> String {
                (**self).quote_identifier(ident)
            }
        }
    };
}

forward_executor!(Box);
forward_executor!(Rc);
forward_executor!(Arc);
