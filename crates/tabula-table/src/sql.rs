//! Statement templating.
//!
//! Statements are plain text: identifiers are quoted by the executor's
//! dialect and values are rendered as literals escaped by the executor.
//! There is no parameter binding at this layer.

use tabula_core::{DataType, QueryExecutor};

/// Render a value as an SQL literal for a column of `data_type`.
///
/// `None` renders as `NULL`. Numeric columns holding a parseable number are
/// written bare; everything else (including empty text in a numeric column)
/// is written as an escaped, single-quoted string.
pub fn render_literal<E: QueryExecutor + ?Sized>(
    executor: &E,
    data_type: DataType,
    value: Option<&str>,
) -> String {
    match value {
        None => "NULL".to_string(),
        Some(v) if is_bare_number(data_type, v) => v.trim().to_string(),
        Some(v) => quote_text(executor, v),
    }
}

/// Render text as an escaped, single-quoted literal.
pub fn quote_text<E: QueryExecutor + ?Sized>(executor: &E, text: &str) -> String {
    format!("'{}'", executor.escape(text))
}

fn is_bare_number(data_type: DataType, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    if data_type.is_integer() {
        value.parse::<i64>().is_ok()
    } else if data_type.is_float() {
        value.parse::<f64>().is_ok_and(f64::is_finite)
    } else {
        false
    }
}

/// `SELECT * FROM t WHERE pk = key`
pub fn select_by_key<E: QueryExecutor + ?Sized>(
    executor: &E,
    table: &str,
    key_column: &str,
    key: i64,
) -> String {
    format!(
        "SELECT * FROM {} WHERE {} = {}",
        executor.quote_identifier(table),
        executor.quote_identifier(key_column),
        key
    )
}

/// `SELECT pk FROM t <filter>` with the caller's clause appended verbatim.
pub fn select_keys<E: QueryExecutor + ?Sized>(
    executor: &E,
    table: &str,
    key_column: &str,
    filter: &str,
) -> String {
    let mut sql = format!(
        "SELECT {} FROM {}",
        executor.quote_identifier(key_column),
        executor.quote_identifier(table)
    );
    let filter = filter.trim();
    if !filter.is_empty() {
        sql.push(' ');
        sql.push_str(filter);
    }
    sql
}

/// `INSERT INTO t (c1, ...) VALUES (v1, ...)`; values are rendered literals.
///
/// With no columns the statement falls back to `DEFAULT VALUES`.
pub fn insert<E: QueryExecutor + ?Sized>(
    executor: &E,
    table: &str,
    assignments: &[(String, String)],
) -> String {
    let table = executor.quote_identifier(table);
    if assignments.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES", table);
    }
    let columns: Vec<String> = assignments
        .iter()
        .map(|(name, _)| executor.quote_identifier(name))
        .collect();
    let values: Vec<&str> = assignments.iter().map(|(_, v)| v.as_str()).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        values.join(", ")
    )
}

/// `UPDATE t SET c1 = v1, ... WHERE pk = key`
pub fn update<E: QueryExecutor + ?Sized>(
    executor: &E,
    table: &str,
    assignments: &[(String, String)],
    key_column: &str,
    key: i64,
) -> String {
    let set_clauses: Vec<String> = assignments
        .iter()
        .map(|(name, value)| format!("{} = {}", executor.quote_identifier(name), value))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {} = {}",
        executor.quote_identifier(table),
        set_clauses.join(", "),
        executor.quote_identifier(key_column),
        key
    )
}

/// `DELETE FROM t WHERE pk = key`
pub fn delete<E: QueryExecutor + ?Sized>(
    executor: &E,
    table: &str,
    key_column: &str,
    key: i64,
) -> String {
    format!(
        "DELETE FROM {} WHERE {} = {}",
        executor.quote_identifier(table),
        executor.quote_identifier(key_column),
        key
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::{ColumnInfo, CommandOutcome, ResultSet, Result};

    struct Dialect;

    impl QueryExecutor for Dialect {
        fn introspect_columns(&self, _table: &str) -> Result<Vec<ColumnInfo>> {
            Ok(Vec::new())
        }

        fn execute_query(&self, _sql: &str) -> Result<ResultSet> {
            Ok(ResultSet::empty(Vec::new()))
        }

        fn execute_command(&self, _sql: &str) -> Result<CommandOutcome> {
            Ok(CommandOutcome::default())
        }
    }

    #[test]
    fn test_render_literal() {
        let d = Dialect;
        assert_eq!(render_literal(&d, DataType::Int, None), "NULL");
        assert_eq!(render_literal(&d, DataType::Int, Some("42")), "42");
        assert_eq!(render_literal(&d, DataType::Double, Some("-1.5e3")), "-1.5e3");
        assert_eq!(render_literal(&d, DataType::Int, Some("")), "''");
        assert_eq!(render_literal(&d, DataType::Double, Some("inf")), "'inf'");
        assert_eq!(render_literal(&d, DataType::Int, Some("1; DROP")), "'1; DROP'");
        assert_eq!(render_literal(&d, DataType::Text, Some("42")), "'42'");
        assert_eq!(render_literal(&d, DataType::Text, Some("O'Brien")), "'O''Brien'");
        assert_eq!(
            render_literal(&d, DataType::Date, Some("1999-10-22")),
            "'1999-10-22'"
        );
    }

    #[test]
    fn test_select_statements() {
        let d = Dialect;
        assert_eq!(
            select_by_key(&d, "adbtest", "InternalID", 7),
            "SELECT * FROM \"adbtest\" WHERE \"InternalID\" = 7"
        );
        assert_eq!(
            select_keys(&d, "Customers", "ID", " where City = 'Seattle' order by ID "),
            "SELECT \"ID\" FROM \"Customers\" where City = 'Seattle' order by ID"
        );
        assert_eq!(
            select_keys(&d, "Customers", "ID", ""),
            "SELECT \"ID\" FROM \"Customers\""
        );
    }

    #[test]
    fn test_write_statements() {
        let d = Dialect;
        let cols = vec![
            ("charfield".to_string(), "'Char Test'".to_string()),
            ("intfield".to_string(), "12345".to_string()),
        ];
        assert_eq!(
            insert(&d, "adbtest", &cols),
            "INSERT INTO \"adbtest\" (\"charfield\", \"intfield\") VALUES ('Char Test', 12345)"
        );
        assert_eq!(
            insert(&d, "adbtest", &[]),
            "INSERT INTO \"adbtest\" DEFAULT VALUES"
        );
        assert_eq!(
            update(&d, "adbtest", &cols[1..], "InternalID", 3),
            "UPDATE \"adbtest\" SET \"intfield\" = 12345 WHERE \"InternalID\" = 3"
        );
        assert_eq!(
            delete(&d, "adbtest", "InternalID", 3),
            "DELETE FROM \"adbtest\" WHERE \"InternalID\" = 3"
        );
    }
}
