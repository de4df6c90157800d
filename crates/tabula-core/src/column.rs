//! Column descriptors: metadata plus current and baseline values for one
//! column of one row.
//!
//! A descriptor keeps two values. The *baseline* ("previous") is captured when
//! the value is loaded from a fetch; the *current* value is whatever the
//! caller has assigned since. A column is dirty when the two differ, so
//! assigning a column back to its loaded value makes it clean again.
//!
//! Encrypted columns hold plaintext in both slots. Encryption and decryption
//! are done by the table accessor at the persistence boundary; a descriptor
//! never sees ciphertext.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::cipher::KeySelector;
use crate::error::ConversionError;
use crate::record::{ColumnInfo, FieldMeta};
use crate::types::DataType;
use crate::value::{self, IntoColumnValue};

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    name: String,
    table_name: String,
    data_type: DataType,
    ordinal: usize,
    primary_key: bool,
    current: Option<String>,
    previous: Option<String>,
    /// Set by any explicit assignment since the last load or clear.
    assigned: bool,
    encryption: Option<KeySelector>,
}

impl ColumnDescriptor {
    /// Create a descriptor with no value from driver field metadata.
    pub fn new(ordinal: usize, meta: &FieldMeta) -> Self {
        Self {
            name: meta.name.clone(),
            table_name: meta.table.clone(),
            data_type: meta.data_type,
            ordinal,
            primary_key: meta.primary_key,
            current: None,
            previous: None,
            assigned: false,
            encryption: None,
        }
    }

    /// Create an empty template from an introspected column.
    pub fn from_info(info: &ColumnInfo, table: &str) -> Self {
        Self::new(info.ordinal, &info.field_meta(table))
    }

    /// (Re)define metadata and load `raw` as both current and baseline value.
    ///
    /// Used when a record is fetched. The encryption flag is not metadata the
    /// driver reports and survives re-definition.
    pub fn define(&mut self, ordinal: usize, meta: &FieldMeta, raw: Option<String>) {
        self.name.clone_from(&meta.name);
        self.table_name.clone_from(&meta.table);
        self.data_type = meta.data_type;
        self.ordinal = ordinal;
        self.primary_key = meta.primary_key;
        self.load_value(raw);
    }

    /// Load a fetched value as both current and baseline.
    pub fn load_value(&mut self, raw: Option<String>) {
        self.previous.clone_from(&raw);
        self.current = raw;
        self.assigned = false;
    }

    /// Assign a new current value in canonical form.
    ///
    /// Fails only when the value cannot be represented in this column's type
    /// (a malformed date, non-numeric text for an integer column, NaN). On
    /// failure the current value is left untouched.
    pub fn set<V: IntoColumnValue>(&mut self, value: V) -> Result<(), ConversionError> {
        let canonical = value
            .into_column_value(self.data_type)
            .map_err(|e| self.conversion_error(e.value, e.message))?;
        self.current = canonical;
        self.assigned = true;
        Ok(())
    }

    /// Assign an explicit SQL `NULL`.
    pub fn set_null(&mut self) {
        self.current = None;
        self.assigned = true;
    }

    /// Append text to the current value, for building large text or blob
    /// values piecewise. Only textual columns accept appends.
    pub fn append(&mut self, text: &str) -> Result<(), ConversionError> {
        if !self.data_type.is_textual() {
            return Err(self.conversion_error(
                text.to_string(),
                "append needs a text or blob column".to_string(),
            ));
        }
        self.current.get_or_insert_with(String::new).push_str(text);
        self.assigned = true;
        Ok(())
    }

    /// Forget both values, keeping metadata.
    pub fn clear_data(&mut self) {
        self.current = None;
        self.previous = None;
        self.assigned = false;
    }

    /// Make the current value the new baseline (after it has been written).
    pub fn commit(&mut self) {
        self.previous.clone_from(&self.current);
        self.assigned = false;
    }

    /// The baseline when `use_backup`, else the current value. Always plaintext.
    pub fn data(&self, use_backup: bool) -> Option<&str> {
        if use_backup {
            self.previous.as_deref()
        } else {
            self.current.as_deref()
        }
    }

    /// Whether the current value differs from the baseline.
    pub fn is_changed(&self) -> bool {
        self.current != self.previous
    }

    /// Whether the value was explicitly assigned since the last load or clear.
    pub fn is_assigned(&self) -> bool {
        self.assigned
    }

    /// Whether an `INSERT` should carry this column: assigned, or holding a
    /// non-empty value. Untouched empty columns are left to database defaults.
    pub fn has_insert_value(&self) -> bool {
        self.assigned || self.current.as_deref().is_some_and(|v| !v.is_empty())
    }

    // ========================================================================
    // Typed getters
    // ========================================================================
    //
    // Numeric getters return 0 when the value is absent or does not parse, so
    // zero is ambiguous between "absent" and "truly zero".

    pub fn to_i64(&self, use_backup: bool) -> i64 {
        self.data(use_backup).and_then(value::parse_i64).unwrap_or(0)
    }

    pub fn to_i32(&self, use_backup: bool) -> i32 {
        i32::try_from(self.to_i64(use_backup)).unwrap_or(0)
    }

    pub fn to_f64(&self, use_backup: bool) -> f64 {
        self.data(use_backup)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|f| f.is_finite())
            .unwrap_or(0.0)
    }

    pub fn to_f32(&self, use_backup: bool) -> f32 {
        self.to_f64(use_backup) as f32
    }

    /// Nonzero numbers and the words `true`/`yes`/`y` read as true.
    pub fn to_bool(&self, use_backup: bool) -> bool {
        match self.data(use_backup).map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("yes") || v.eq_ignore_ascii_case("y") => true,
            _ => self.to_f64(use_backup) != 0.0,
        }
    }

    pub fn to_date(&self, use_backup: bool) -> Option<NaiveDate> {
        self.data(use_backup).and_then(value::parse_date)
    }

    pub fn to_time(&self, use_backup: bool) -> Option<NaiveTime> {
        self.data(use_backup).and_then(value::parse_time)
    }

    pub fn to_datetime(&self, use_backup: bool) -> Option<NaiveDateTime> {
        self.data(use_backup).and_then(value::parse_datetime)
    }

    /// Seconds since the Unix epoch (UTC), 0 when not a date or date-time.
    pub fn to_unix_time(&self, use_backup: bool) -> i64 {
        self.to_datetime(use_backup)
            .map_or(0, |dt| dt.and_utc().timestamp())
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Move the descriptor to another position; values and flags are kept.
    pub(crate) fn set_ordinal(&mut self, ordinal: usize) {
        self.ordinal = ordinal;
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn set_primary_key(&mut self, primary_key: bool) {
        self.primary_key = primary_key;
    }

    pub fn set_data_type(&mut self, data_type: DataType) {
        self.data_type = data_type;
    }

    pub fn set_table_name(&mut self, table: impl Into<String>) {
        self.table_name = table.into();
    }

    /// Mark (or unmark) the column for transparent encryption.
    ///
    /// Only affects how values are written and read from now on; a value that
    /// is already loaded is not re-encrypted or re-decrypted.
    pub fn set_encrypted(&mut self, encrypted: bool, key: KeySelector) {
        self.encryption = encrypted.then_some(key);
    }

    pub fn is_encrypted(&self) -> bool {
        self.encryption.is_some()
    }

    /// The key selector, when the column is encrypted.
    pub fn key_selector(&self) -> Option<KeySelector> {
        self.encryption
    }

    fn conversion_error(&self, value: String, message: String) -> ConversionError {
        ConversionError {
            column: self.name.clone(),
            data_type: self.data_type,
            value,
            message,
        }
    }
}
