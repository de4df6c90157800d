//! Data exchanged with a query executor.
//!
//! An executor answers a query with a [`ResultSet`]: field metadata plus a
//! forward-only sequence of [`Record`]s whose values are already in canonical
//! text form. Schema introspection answers with [`ColumnInfo`]s, and write
//! commands with a [`CommandOutcome`].

use serde::{Deserialize, Serialize};

use crate::types::DataType;

/// Driver metadata for one field of a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMeta {
    /// Column name (or alias) as returned by the query.
    pub name: String,
    /// Owning table, empty when the driver cannot tell (computed columns).
    pub table: String,
    /// Reported type class.
    pub data_type: DataType,
    /// Whether the driver flags this field as (part of) the primary key.
    pub primary_key: bool,
}

impl FieldMeta {
    /// Create field metadata with no table and no key flag.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            table: String::new(),
            data_type,
            primary_key: false,
        }
    }

    /// Set the owning table.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Flag as primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// One fetched record: a value per field, `None` for SQL `NULL`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: Vec<Option<String>>,
}

impl Record {
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    /// Value of the field at `ordinal`; `None` for NULL or out of range.
    pub fn get(&self, ordinal: usize) -> Option<&str> {
        self.values.get(ordinal).and_then(|v| v.as_deref())
    }

    /// Whether the field at `ordinal` is SQL `NULL` (or absent).
    pub fn is_null(&self, ordinal: usize) -> bool {
        self.get(ordinal).is_none()
    }

    /// Length in bytes of the field at `ordinal` (0 for NULL).
    pub fn length(&self, ordinal: usize) -> usize {
        self.get(ordinal).map_or(0, str::len)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Option<String>> {
        self.values
    }
}

impl From<Vec<Option<String>>> for Record {
    fn from(values: Vec<Option<String>>) -> Self {
        Self::new(values)
    }
}

/// The answer to a query: field metadata plus records consumed in order.
#[derive(Debug)]
pub struct ResultSet {
    fields: Vec<FieldMeta>,
    records: std::vec::IntoIter<Record>,
    row_count: usize,
}

impl ResultSet {
    pub fn new(fields: Vec<FieldMeta>, records: Vec<Record>) -> Self {
        let row_count = records.len();
        Self {
            fields,
            records: records.into_iter(),
            row_count,
        }
    }

    /// A result set with fields but no records.
    pub fn empty(fields: Vec<FieldMeta>) -> Self {
        Self::new(fields, Vec::new())
    }

    pub fn fields(&self) -> &[FieldMeta] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Total number of records the query returned (consumed or not).
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of records not yet consumed.
    pub fn remaining(&self) -> usize {
        self.records.len()
    }

    /// Take the next record, `None` at the end of the set.
    pub fn next_record(&mut self) -> Option<Record> {
        self.records.next()
    }
}

impl Iterator for ResultSet {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        self.next_record()
    }
}

/// One column of an introspected table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: DataType,
    /// 0-based position in the table.
    pub ordinal: usize,
    pub primary_key: bool,
    pub nullable: bool,
}

impl ColumnInfo {
    /// Create a nullable, non-key column description.
    pub fn new(name: impl Into<String>, data_type: DataType, ordinal: usize) -> Self {
        Self {
            name: name.into(),
            data_type,
            ordinal,
            primary_key: false,
            nullable: true,
        }
    }

    /// Mark as primary key (primary keys are never nullable).
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Mark as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Field metadata for this column when read from `table`.
    pub fn field_meta(&self, table: &str) -> FieldMeta {
        FieldMeta {
            name: self.name.clone(),
            table: table.to_string(),
            data_type: self.data_type,
            primary_key: self.primary_key,
        }
    }
}

/// The answer to a write command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub affected_rows: u64,
    /// Identity generated by an `INSERT`, when the database produced one.
    pub generated_id: Option<i64>,
}

impl CommandOutcome {
    pub fn affected(rows: u64) -> Self {
        Self {
            affected_rows: rows,
            generated_id: None,
        }
    }

    pub fn inserted(rows: u64, id: i64) -> Self {
        Self {
            affected_rows: rows,
            generated_id: Some(id),
        }
    }
}
