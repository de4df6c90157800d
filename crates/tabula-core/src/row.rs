//! Rows: the ordered column descriptors of one fetched record.

use crate::column::ColumnDescriptor;
use crate::record::{FieldMeta, Record, ResultSet};
use crate::types::DataType;
use crate::value::ZERO_DATE;

/// Address of a column within a row: exact name or 0-based ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey<'a> {
    Name(&'a str),
    Ordinal(usize),
}

impl<'a> From<&'a str> for ColumnKey<'a> {
    fn from(name: &'a str) -> Self {
        ColumnKey::Name(name)
    }
}

impl<'a> From<&'a String> for ColumnKey<'a> {
    fn from(name: &'a String) -> Self {
        ColumnKey::Name(name.as_str())
    }
}

impl From<usize> for ColumnKey<'_> {
    fn from(ordinal: usize) -> Self {
        ColumnKey::Ordinal(ordinal)
    }
}

impl ColumnKey<'_> {
    /// Owned form for error reporting.
    pub fn to_ref(&self) -> crate::error::ColumnRef {
        match self {
            ColumnKey::Name(name) => crate::error::ColumnRef::Name((*name).to_string()),
            ColumnKey::Ordinal(ordinal) => crate::error::ColumnRef::Ordinal(*ordinal),
        }
    }
}

/// An ordered set of column descriptors, owned exclusively by the row.
///
/// Ordinals are contiguous `0..len()`. Name lookup is an exact, case-sensitive
/// match. Missing columns are a normal `None`, not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<ColumnDescriptor>,
    zero_dates_as_empty: bool,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from descriptors, renumbering ordinals to their positions.
    pub fn from_columns(columns: Vec<ColumnDescriptor>) -> Self {
        let mut row = Self {
            columns,
            zero_dates_as_empty: false,
        };
        row.renumber();
        row
    }

    /// Present `0000-00-00` dates as empty text through [`Row::value`].
    pub fn set_zero_dates_as_empty(&mut self, enabled: bool) {
        self.zero_dates_as_empty = enabled;
    }

    pub fn zero_dates_as_empty(&self) -> bool {
        self.zero_dates_as_empty
    }

    /// Load the next record of `rs` into this row.
    ///
    /// Returns `false` (leaving the row untouched) at the end of the result
    /// set. Descriptors are reused while the field layout stays the same, so
    /// iterating one query does not reallocate; a different layout (another
    /// query) discards them and builds a fresh set.
    pub fn load(&mut self, rs: &mut ResultSet) -> bool {
        let Some(record) = rs.next_record() else {
            return false;
        };
        self.load_record(rs.fields(), record);
        true
    }

    /// Load one record with its field metadata.
    pub fn load_record(&mut self, fields: &[FieldMeta], record: Record) {
        if !self.matches_layout(fields) {
            tracing::trace!(fields = fields.len(), "Rebuilding row layout");
            self.columns = fields
                .iter()
                .enumerate()
                .map(|(i, meta)| ColumnDescriptor::new(i, meta))
                .collect();
        }

        let mut values = record.into_values().into_iter();
        for (i, (column, meta)) in self.columns.iter_mut().zip(fields).enumerate() {
            column.define(i, meta, values.next().flatten());
        }
    }

    fn matches_layout(&self, fields: &[FieldMeta]) -> bool {
        self.columns.len() == fields.len()
            && self
                .columns
                .iter()
                .zip(fields)
                .all(|(c, f)| c.name() == f.name && c.table_name() == f.table)
    }

    fn renumber(&mut self) {
        for (i, column) in self.columns.iter_mut().enumerate() {
            column.set_ordinal(i);
        }
    }

    /// Discard all descriptors.
    pub fn clear(&mut self) {
        self.columns.clear();
    }

    /// Forget every value, keeping the descriptors and their metadata.
    pub fn clear_data(&mut self) {
        for column in &mut self.columns {
            column.clear_data();
        }
    }

    /// Make every current value the new baseline.
    pub fn commit(&mut self) {
        for column in &mut self.columns {
            column.commit();
        }
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column<'k>(&self, key: impl Into<ColumnKey<'k>>) -> Option<&ColumnDescriptor> {
        match key.into() {
            ColumnKey::Ordinal(i) => self.columns.get(i),
            ColumnKey::Name(name) => self.columns.iter().find(|c| c.name() == name),
        }
    }

    pub fn column_mut<'k>(
        &mut self,
        key: impl Into<ColumnKey<'k>>,
    ) -> Option<&mut ColumnDescriptor> {
        match key.into() {
            ColumnKey::Ordinal(i) => self.columns.get_mut(i),
            ColumnKey::Name(name) => self.columns.iter_mut().find(|c| c.name() == name),
        }
    }

    /// Current value of a column, with zero-date normalization applied.
    ///
    /// `None` when the column does not exist or holds NULL. The stored value is
    /// never modified by the normalization.
    pub fn value<'k>(&self, key: impl Into<ColumnKey<'k>>) -> Option<&str> {
        self.data(key, false)
    }

    /// Like [`Row::value`], reading the loaded baseline when `use_backup`.
    pub fn data<'k>(&self, key: impl Into<ColumnKey<'k>>, use_backup: bool) -> Option<&str> {
        let column = self.column(key)?;
        let data = column.data(use_backup)?;
        if self.zero_dates_as_empty && column.data_type() == DataType::Date && data == ZERO_DATE {
            return Some("");
        }
        Some(data)
    }

    /// The first column flagged as primary key, if any.
    pub fn primary_key(&self) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.is_primary_key())
    }

    /// Columns whose current value differs from the loaded baseline.
    pub fn changed_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.is_changed())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDescriptor> {
        self.columns.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ColumnDescriptor> {
        self.columns.iter_mut()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a ColumnDescriptor;
    type IntoIter = std::slice::Iter<'a, ColumnDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
