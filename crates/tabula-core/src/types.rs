//! Driver-reported column types.

use serde::{Deserialize, Serialize};

/// The type class of a column as reported by the driver.
///
/// Values are always held in canonical text form; the type decides how that
/// text is validated on assignment, rendered into statements and parsed by the
/// typed getters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Decimal,
    #[default]
    Text,
    Blob,
    Date,
    Time,
    DateTime,
    Timestamp,
    Year,
    Null,
}

impl DataType {
    /// Lowercase name used in messages and configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DataType::TinyInt => "tinyint",
            DataType::SmallInt => "smallint",
            DataType::Int => "int",
            DataType::BigInt => "bigint",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Decimal => "decimal",
            DataType::Text => "text",
            DataType::Blob => "blob",
            DataType::Date => "date",
            DataType::Time => "time",
            DataType::DateTime => "datetime",
            DataType::Timestamp => "timestamp",
            DataType::Year => "year",
            DataType::Null => "null",
        }
    }

    /// Integer classes (including `YEAR`, which MySQL stores as a small integer).
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::TinyInt | DataType::SmallInt | DataType::Int | DataType::BigInt | DataType::Year
        )
    }

    /// Floating and fixed-point classes.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, DataType::Float | DataType::Double | DataType::Decimal)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Date, time and date-time classes.
    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            DataType::Date | DataType::Time | DataType::DateTime | DataType::Timestamp
        )
    }

    /// Classes whose values can be built up incrementally with `append`.
    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(self, DataType::Text | DataType::Blob | DataType::Null)
    }

    /// Map a declared SQL type name to a type class.
    ///
    /// Exact MySQL-style names are recognised first; anything else falls back
    /// to SQLite's affinity rules (`INT` anywhere means integer, `CHAR`/`CLOB`/
    /// `TEXT` means text, `BLOB` or no type means blob, `REAL`/`FLOA`/`DOUB`
    /// means floating, everything else is numeric and treated as decimal).
    #[must_use]
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.trim().to_ascii_uppercase();
        let base = upper
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or("");

        match base {
            "TINYINT" | "BOOL" | "BOOLEAN" => return DataType::TinyInt,
            "SMALLINT" | "MEDIUMINT" => return DataType::SmallInt,
            "INT" | "INTEGER" => return DataType::Int,
            "BIGINT" => return DataType::BigInt,
            "FLOAT" => return DataType::Float,
            "DOUBLE" | "REAL" => return DataType::Double,
            "DECIMAL" | "NUMERIC" => return DataType::Decimal,
            "DATE" => return DataType::Date,
            "TIME" => return DataType::Time,
            "DATETIME" => return DataType::DateTime,
            "TIMESTAMP" => return DataType::Timestamp,
            "YEAR" => return DataType::Year,
            "NULL" => return DataType::Null,
            _ => {}
        }

        if upper.contains("INT") {
            DataType::BigInt
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            DataType::Text
        } else if upper.is_empty() || upper.contains("BLOB") || upper.contains("BINARY") {
            DataType::Blob
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            DataType::Double
        } else {
            DataType::Decimal
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_declared_mysql_names() {
        assert_eq!(DataType::from_declared("tinyint(1)"), DataType::TinyInt);
        assert_eq!(DataType::from_declared("INT(11) UNSIGNED"), DataType::Int);
        assert_eq!(DataType::from_declared("bigint"), DataType::BigInt);
        assert_eq!(DataType::from_declared("DECIMAL(10,2)"), DataType::Decimal);
        assert_eq!(DataType::from_declared("date"), DataType::Date);
        assert_eq!(DataType::from_declared("datetime"), DataType::DateTime);
        assert_eq!(DataType::from_declared("TIMESTAMP"), DataType::Timestamp);
        assert_eq!(DataType::from_declared("time"), DataType::Time);
        assert_eq!(DataType::from_declared("year(4)"), DataType::Year);
    }

    #[test]
    fn test_from_declared_sqlite_affinity() {
        assert_eq!(DataType::from_declared("UNSIGNED BIG INT"), DataType::BigInt);
        assert_eq!(DataType::from_declared("VARCHAR(255)"), DataType::Text);
        assert_eq!(DataType::from_declared("NATIVE CHARACTER(70)"), DataType::Text);
        assert_eq!(DataType::from_declared("CLOB"), DataType::Text);
        assert_eq!(DataType::from_declared(""), DataType::Blob);
        assert_eq!(DataType::from_declared("LONGBLOB"), DataType::Blob);
        assert_eq!(DataType::from_declared("DOUBLE PRECISION"), DataType::Double);
        assert_eq!(DataType::from_declared("BOOLEAN"), DataType::TinyInt);
    }

    #[test]
    fn test_type_classes() {
        assert!(DataType::Year.is_integer());
        assert!(DataType::Decimal.is_float());
        assert!(DataType::Timestamp.is_temporal());
        assert!(DataType::Blob.is_textual());
        assert!(!DataType::Date.is_textual());
        assert!(!DataType::Text.is_numeric());
    }
}
