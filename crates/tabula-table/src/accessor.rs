//! The table accessor: single-row CRUD over one introspected table.
//!
//! A [`TableAccessor`] is bound to one table name. The first operation that
//! needs the schema asks the executor for the table's columns, resolves the
//! primary key and keeps both for the accessor's lifetime. All reads and
//! writes then go through one *working row*:
//!
//! - [`TableAccessor::get`] loads the row with a given key into it;
//! - setters change its current values, leaving the loaded baseline intact;
//! - [`TableAccessor::ins`] writes every column that holds a value;
//! - [`TableAccessor::upd`] writes only the columns whose current value
//!   differs from the baseline, keyed by the loaded key;
//! - [`TableAccessor::del`] deletes by explicit key or the loaded key.
//!
//! Columns registered with [`TableAccessor::set_encrypted_column`] are
//! decrypted as a row is loaded and encrypted while statement text is built,
//! so the working row only ever holds plaintext.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tabula_core::value::{self, ZERO_DATE};
use tabula_core::{
    CipherError, CipherErrorKind, ColumnCipher, ColumnDescriptor, ColumnInfo, ColumnKey,
    CommandOutcome, CompositeKeyPolicy, DataType, Error, IntoColumnValue, IntrospectionError,
    KeySelector, PrimaryKeyErrorKind, QueryExecutor, Result, Row, TableConfig,
};

use crate::hooks::{HookEvent, HookKind, Hooks};
use crate::sql;

/// How the table's primary key resolved at introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryKey {
    /// One key column, by ordinal.
    Single(usize),
    /// The table reports no key column.
    Missing,
    /// The table reports several key columns (ordinals in table order).
    Composite(Vec<usize>),
}

/// The introspected shape of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    columns: Vec<ColumnInfo>,
    primary_key: PrimaryKey,
}

impl TableSchema {
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn primary_key(&self) -> &PrimaryKey {
        &self.primary_key
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Name of the resolved single key column.
    pub fn primary_key_name(&self) -> Option<&str> {
        match self.primary_key {
            PrimaryKey::Single(i) => self.columns.get(i).map(|c| c.name.as_str()),
            _ => None,
        }
    }
}

/// Single-row access to one table.
///
/// An accessor mutates its working row in place on every call and must not be
/// shared across threads without external locking.
pub struct TableAccessor<E: QueryExecutor> {
    executor: E,
    table: String,
    config: TableConfig,
    cipher: Option<Arc<dyn ColumnCipher>>,
    schema: Option<TableSchema>,
    /// Encrypted columns by name, applied to every working row.
    encrypted: BTreeMap<String, KeySelector>,
    row: Row,
    hooks: Hooks,
}

impl<E: QueryExecutor> TableAccessor<E> {
    /// Bind an accessor to `table` with the default configuration.
    ///
    /// No I/O happens here; the table is introspected on first use.
    pub fn new(executor: E, table: impl Into<String>) -> Result<Self> {
        Self::with_config(executor, table, TableConfig::default())
    }

    pub fn with_config(executor: E, table: impl Into<String>, config: TableConfig) -> Result<Self> {
        let table = table.into();
        tabula_core::validate_identifier(&table)?;
        config.validate()?;
        let mut row = Row::new();
        row.set_zero_dates_as_empty(config.zero_dates_as_empty);
        Ok(Self {
            executor,
            table,
            config,
            cipher: None,
            schema: None,
            encrypted: BTreeMap::new(),
            row,
            hooks: Hooks::default(),
        })
    }

    /// Attach the cipher used for encrypted columns.
    pub fn with_cipher(mut self, cipher: Arc<dyn ColumnCipher>) -> Self {
        self.cipher = Some(cipher);
        self
    }

    pub fn set_cipher(&mut self, cipher: Option<Arc<dyn ColumnCipher>>) {
        self.cipher = cipher;
    }

    /// Run `hook` after every successful insert.
    pub fn on_insert(&mut self, hook: impl FnMut(&HookEvent<'_>) + Send + 'static) {
        self.hooks.set(HookKind::Insert, Box::new(hook));
    }

    /// Run `hook` after every successful update that wrote something.
    pub fn on_update(&mut self, hook: impl FnMut(&HookEvent<'_>) + Send + 'static) {
        self.hooks.set(HookKind::Update, Box::new(hook));
    }

    /// Run `hook` after every successful delete.
    pub fn on_delete(&mut self, hook: impl FnMut(&HookEvent<'_>) + Send + 'static) {
        self.hooks.set(HookKind::Delete, Box::new(hook));
    }

    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// The schema, once introspected.
    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_ref()
    }

    /// The working row.
    pub fn row(&self) -> &Row {
        &self.row
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Load the table's column set and resolve its primary key.
    ///
    /// Runs the schema query at most once per accessor; later calls return
    /// immediately. Also prepares an empty working row when none is loaded.
    #[tracing::instrument(level = "debug", skip(self), fields(table = %self.table))]
    pub fn introspect(&mut self) -> Result<()> {
        if self.schema.is_some() {
            return Ok(());
        }
        self.ensure_connected()?;

        let mut columns = self
            .executor
            .introspect_columns(&self.table)
            .map_err(|e| self.introspection_error(e))?;
        if columns.is_empty() {
            return Err(self.introspection_message("no readable columns"));
        }
        if columns.len() > self.config.max_columns {
            return Err(self.introspection_message(&format!(
                "{} columns exceed the limit of {}",
                columns.len(),
                self.config.max_columns
            )));
        }
        columns.sort_by_key(|c| c.ordinal);
        for (i, column) in columns.iter_mut().enumerate() {
            column.ordinal = i;
        }

        let key_ordinals: Vec<usize> = columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.ordinal)
            .collect();
        let primary_key = match key_ordinals.as_slice() {
            [] => PrimaryKey::Missing,
            [only] => PrimaryKey::Single(*only),
            [first, ..] if self.config.composite_key_policy == CompositeKeyPolicy::FirstColumn => {
                tracing::warn!(
                    table = %self.table,
                    key_columns = key_ordinals.len(),
                    "Composite primary key, honouring the first column"
                );
                PrimaryKey::Single(*first)
            }
            _ => PrimaryKey::Composite(key_ordinals.clone()),
        };

        let schema = TableSchema {
            columns,
            primary_key,
        };
        tracing::info!(
            table = %self.table,
            columns = schema.columns.len(),
            primary_key = schema.primary_key_name().unwrap_or(""),
            "Introspected table"
        );
        self.schema = Some(schema);

        if self.row.is_empty() {
            self.row = self.template_row();
        }
        Ok(())
    }

    /// Ordinal of the single primary-key column.
    ///
    /// Fails when the key is absent or composite.
    pub fn primary_key_ordinal(&mut self) -> Result<usize> {
        self.introspect()?;
        let schema = self.schema_ref()?;
        match &schema.primary_key {
            PrimaryKey::Single(i) => Ok(*i),
            PrimaryKey::Missing => Err(Error::primary_key(
                self.table.as_str(),
                PrimaryKeyErrorKind::Missing,
            )),
            PrimaryKey::Composite(ordinals) => {
                let names = ordinals
                    .iter()
                    .filter_map(|i| schema.columns.get(*i))
                    .map(|c| c.name.clone())
                    .collect();
                Err(Error::primary_key(
                    self.table.as_str(),
                    PrimaryKeyErrorKind::Composite(names),
                ))
            }
        }
    }

    /// Name of the single primary-key column.
    pub fn primary_key_name(&mut self) -> Result<String> {
        let ordinal = self.primary_key_ordinal()?;
        self.schema_ref()?
            .columns
            .get(ordinal)
            .map(|c| c.name.clone())
            .ok_or_else(|| Error::primary_key(self.table.as_str(), PrimaryKeyErrorKind::Missing))
    }

    fn schema_ref(&self) -> Result<&TableSchema> {
        self.schema
            .as_ref()
            .ok_or_else(|| self.introspection_message("table not introspected"))
    }

    // ========================================================================
    // Working row
    // ========================================================================

    /// Reset the working row to empty values, keeping column metadata, to
    /// compose a fresh record for insertion.
    pub fn clear_data(&mut self) -> Result<()> {
        self.introspect()?;
        self.row = self.template_row();
        Ok(())
    }

    /// Assign a value to a column of the working row.
    pub fn set_value<'k, V: IntoColumnValue>(
        &mut self,
        column: impl Into<ColumnKey<'k>>,
        value: V,
    ) -> Result<()> {
        self.working_column(column.into())?.set(value)?;
        Ok(())
    }

    /// Assign an explicit SQL `NULL`.
    pub fn set_null<'k>(&mut self, column: impl Into<ColumnKey<'k>>) -> Result<()> {
        self.working_column(column.into())?.set_null();
        Ok(())
    }

    /// Append text to a text or blob column.
    pub fn append_str<'k>(&mut self, column: impl Into<ColumnKey<'k>>, text: &str) -> Result<()> {
        self.working_column(column.into())?.append(text)?;
        Ok(())
    }

    /// A column of the working row, `None` when it does not exist.
    pub fn column<'k>(&self, column: impl Into<ColumnKey<'k>>) -> Option<&ColumnDescriptor> {
        self.row.column(column)
    }

    /// Text value of a column (zero dates normalized per configuration).
    pub fn get_str<'k>(
        &self,
        column: impl Into<ColumnKey<'k>>,
        use_backup: bool,
    ) -> Result<Option<&str>> {
        let key = column.into();
        self.require(key)?;
        Ok(self.row.data(key, use_backup))
    }

    pub fn get_i32<'k>(&self, column: impl Into<ColumnKey<'k>>, use_backup: bool) -> Result<i32> {
        Ok(self.require(column.into())?.to_i32(use_backup))
    }

    pub fn get_i64<'k>(&self, column: impl Into<ColumnKey<'k>>, use_backup: bool) -> Result<i64> {
        Ok(self.require(column.into())?.to_i64(use_backup))
    }

    pub fn get_f32<'k>(&self, column: impl Into<ColumnKey<'k>>, use_backup: bool) -> Result<f32> {
        Ok(self.require(column.into())?.to_f32(use_backup))
    }

    pub fn get_f64<'k>(&self, column: impl Into<ColumnKey<'k>>, use_backup: bool) -> Result<f64> {
        Ok(self.require(column.into())?.to_f64(use_backup))
    }

    pub fn get_bool<'k>(&self, column: impl Into<ColumnKey<'k>>, use_backup: bool) -> Result<bool> {
        Ok(self.require(column.into())?.to_bool(use_backup))
    }

    pub fn get_date<'k>(
        &self,
        column: impl Into<ColumnKey<'k>>,
        use_backup: bool,
    ) -> Result<Option<chrono::NaiveDate>> {
        Ok(self.require(column.into())?.to_date(use_backup))
    }

    pub fn get_time<'k>(
        &self,
        column: impl Into<ColumnKey<'k>>,
        use_backup: bool,
    ) -> Result<Option<chrono::NaiveTime>> {
        Ok(self.require(column.into())?.to_time(use_backup))
    }

    pub fn get_datetime<'k>(
        &self,
        column: impl Into<ColumnKey<'k>>,
        use_backup: bool,
    ) -> Result<Option<chrono::NaiveDateTime>> {
        Ok(self.require(column.into())?.to_datetime(use_backup))
    }

    /// Seconds since the Unix epoch, 0 when the value is not a date.
    pub fn get_unix_time<'k>(
        &self,
        column: impl Into<ColumnKey<'k>>,
        use_backup: bool,
    ) -> Result<i64> {
        Ok(self.require(column.into())?.to_unix_time(use_backup))
    }

    /// Mark a column for transparent encryption with the given key.
    ///
    /// The registration outlives working-row rebuilds. A value that is already
    /// loaded is not re-decrypted; call [`TableAccessor::get`] again to read it.
    pub fn set_encrypted_column(&mut self, column: &str, key: KeySelector) -> Result<()> {
        if let Some(schema) = &self.schema {
            if schema.column(column).is_none() {
                return Err(Error::ColumnNotFound(tabula_core::ColumnRef::Name(
                    column.to_string(),
                )));
            }
        }
        self.encrypted.insert(column.to_string(), key);
        if let Some(descriptor) = self.row.column_mut(column) {
            descriptor.set_encrypted(true, key);
        }
        Ok(())
    }

    /// Stop encrypting a column.
    pub fn clear_encrypted_column(&mut self, column: &str) {
        self.encrypted.remove(column);
        if let Some(descriptor) = self.row.column_mut(column) {
            descriptor.set_encrypted(false, KeySelector::default());
        }
    }

    fn require(&self, key: ColumnKey<'_>) -> Result<&ColumnDescriptor> {
        self.row
            .column(key)
            .ok_or_else(|| Error::ColumnNotFound(key.to_ref()))
    }

    fn working_column(&mut self, key: ColumnKey<'_>) -> Result<&mut ColumnDescriptor> {
        self.introspect()?;
        self.row
            .column_mut(key)
            .ok_or_else(|| Error::ColumnNotFound(key.to_ref()))
    }

    /// An empty row shaped like the table.
    fn template_row(&self) -> Row {
        let columns: Vec<ColumnDescriptor> = self
            .schema
            .as_ref()
            .map(|schema| {
                schema
                    .columns
                    .iter()
                    .map(|info| ColumnDescriptor::from_info(info, &self.table))
                    .collect()
            })
            .unwrap_or_default();
        let mut row = Row::from_columns(columns);
        self.apply_column_settings(&mut row);
        row
    }

    /// Bring a row's metadata in line with the schema and registrations.
    ///
    /// The schema is authoritative for type and key flag; drivers that infer
    /// types from values cannot tell a date column from text.
    fn apply_column_settings(&self, row: &mut Row) {
        row.set_zero_dates_as_empty(self.config.zero_dates_as_empty);
        let key_name = self.schema.as_ref().and_then(TableSchema::primary_key_name);
        for column in row.iter_mut() {
            if let Some(info) = self.schema.as_ref().and_then(|s| s.column(column.name())) {
                column.set_data_type(info.data_type);
                column.set_table_name(self.table.as_str());
            }
            column.set_primary_key(key_name == Some(column.name()));
            match self.encrypted.get(column.name()) {
                Some(key) => column.set_encrypted(true, *key),
                None => column.set_encrypted(false, KeySelector::default()),
            }
        }
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Load the row whose primary key equals `key` into the working row.
    ///
    /// Returns `Ok(None)` (and an empty working row) when no row matches.
    #[tracing::instrument(level = "debug", skip(self), fields(table = %self.table))]
    pub fn get(&mut self, key: i64) -> Result<Option<i64>> {
        self.ensure_connected()?;
        let key_name = self.primary_key_name()?;
        let sql = sql::select_by_key(&self.executor, &self.table, &key_name, key);
        tracing::debug!(sql = %sql, "Fetching row");
        let mut rs = self.executor.execute_query(&sql)?;

        let mut row = std::mem::take(&mut self.row);
        if !row.load(&mut rs) {
            tracing::debug!(key, "No row matched");
            self.row = self.template_row();
            return Ok(None);
        }
        self.apply_column_settings(&mut row);
        if let Err(e) = self.decrypt_row(&mut row) {
            self.row = self.template_row();
            return Err(e);
        }
        self.row = row;
        Ok(Some(key))
    }

    /// Insert the working row.
    ///
    /// Every column that was assigned or holds a non-empty value is written;
    /// untouched columns are left to database defaults. With `auto_get`, the
    /// new row is read back so generated values become visible. Returns the
    /// new key: the key column's written value, else the generated identity,
    /// else 0.
    ///
    /// A failed reload is logged rather than returned: the row is stored, the
    /// key is reported and the hook still runs.
    #[tracing::instrument(level = "debug", skip(self), fields(table = %self.table))]
    pub fn ins(&mut self, auto_get: bool) -> Result<i64> {
        self.ensure_connected()?;
        self.introspect()?;

        let mut assignments = Vec::new();
        for column in self.row.iter().filter(|c| c.has_insert_value()) {
            assignments.push((column.name().to_string(), self.render(column)?));
        }
        let sql = sql::insert(&self.executor, &self.table, &assignments);
        let outcome = self.run_command(&sql)?;

        let key_ordinal = self.primary_key_ordinal().ok();
        let written_key = key_ordinal
            .and_then(|i| self.row.column(i))
            .and_then(|c| c.data(false))
            .and_then(value::parse_i64);
        let key = written_key.or(outcome.generated_id).unwrap_or(0);
        tracing::info!(table = %self.table, key, columns = assignments.len(), "Inserted row");

        match key_ordinal {
            Some(_) if auto_get => self.reload_after_write(key, HookKind::Insert),
            Some(ordinal) => {
                self.row.commit();
                if let Some(column) = self.row.column_mut(ordinal) {
                    if written_key.is_none() && outcome.generated_id.is_some() {
                        column.load_value(Some(key.to_string()));
                    }
                }
            }
            None => self.row.commit(),
        }

        self.run_hook(HookKind::Insert, Some(key));
        Ok(key)
    }

    /// Write the working row's dirty columns back, keyed by the loaded key.
    ///
    /// With no dirty column nothing is written and no hook runs. Returns the
    /// row's key after the update. As with [`TableAccessor::ins`], a failed
    /// `auto_get` reload is logged and does not fail the update.
    #[tracing::instrument(level = "debug", skip(self), fields(table = %self.table))]
    pub fn upd(&mut self, auto_get: bool) -> Result<i64> {
        self.ensure_connected()?;
        let ordinal = self.primary_key_ordinal()?;
        let key_name = self.primary_key_name()?;
        let loaded_key = self.loaded_key(ordinal)?;

        let mut assignments = Vec::new();
        for column in self.row.changed_columns() {
            assignments.push((column.name().to_string(), self.render(column)?));
        }
        if assignments.is_empty() {
            tracing::debug!(key = loaded_key, "No dirty columns, nothing to update");
            return Ok(loaded_key);
        }

        let sql = sql::update(&self.executor, &self.table, &assignments, &key_name, loaded_key);
        let outcome = self.run_command(&sql)?;
        if outcome.affected_rows == 0 {
            tracing::warn!(table = %self.table, key = loaded_key, "Update matched no row");
        }

        let key = self
            .row
            .column(ordinal)
            .and_then(|c| c.data(false))
            .and_then(value::parse_i64)
            .unwrap_or(loaded_key);
        tracing::info!(table = %self.table, key, columns = assignments.len(), "Updated row");

        if auto_get {
            self.reload_after_write(key, HookKind::Update);
        } else {
            self.row.commit();
        }

        self.run_hook(HookKind::Update, Some(key));
        Ok(key)
    }

    /// Delete by `key`, or by the working row's loaded key when `None`.
    ///
    /// Returns the number of rows deleted.
    #[tracing::instrument(level = "debug", skip(self), fields(table = %self.table))]
    pub fn del(&mut self, key: Option<i64>) -> Result<u64> {
        self.ensure_connected()?;
        let ordinal = self.primary_key_ordinal()?;
        let key_name = self.primary_key_name()?;
        let key = match key {
            Some(key) => key,
            None => self.loaded_key(ordinal)?,
        };

        let sql = sql::delete(&self.executor, &self.table, &key_name, key);
        let outcome = self.run_command(&sql)?;
        tracing::info!(table = %self.table, key, affected = outcome.affected_rows, "Deleted row");

        self.run_hook(HookKind::Delete, Some(key));
        Ok(outcome.affected_rows)
    }

    /// Read a just-written row back into the working row.
    ///
    /// Failures are logged and leave the working row as the fetch left it.
    fn reload_after_write(&mut self, key: i64, kind: HookKind) {
        match self.get(key) {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::warn!(table = %self.table, key, write = ?kind, "Written row not found on reload");
            }
            Err(e) => {
                tracing::warn!(table = %self.table, key, write = ?kind, error = %e, "Reload after write failed");
            }
        }
    }

    /// The key as loaded (baseline) in the working row.
    fn loaded_key(&self, ordinal: usize) -> Result<i64> {
        self.row
            .column(ordinal)
            .and_then(|c| c.data(true))
            .and_then(value::parse_i64)
            .ok_or_else(|| {
                Error::primary_key(self.table.as_str(), PrimaryKeyErrorKind::NotLoaded)
            })
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    fn ensure_connected(&self) -> Result<()> {
        if self.executor.is_connected() {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }

    fn run_command(&self, sql: &str) -> Result<CommandOutcome> {
        tracing::debug!(sql = %sql, "Executing command");
        if self.config.log_statements {
            tracing::info!(table = %self.table, sql = %sql, "Write statement");
        }
        self.executor.execute_command(sql)
    }

    fn run_hook(&mut self, kind: HookKind, key: Option<i64>) {
        let event = HookEvent {
            table: &self.table,
            key,
            row: &self.row,
        };
        self.hooks.run(kind, &event);
    }

    /// Render a column's current value as a literal, encrypting if flagged.
    fn render(&self, column: &ColumnDescriptor) -> Result<String> {
        let Some(plain) = column.data(false) else {
            return Ok("NULL".to_string());
        };
        let Some(key) = column.key_selector() else {
            return Ok(sql::render_literal(
                &self.executor,
                column.data_type(),
                Some(plain),
            ));
        };
        let cipher = self.cipher_for(column.name())?;
        let sealed = cipher
            .encrypt(plain.as_bytes(), key, column.name())
            .map_err(|e| with_column(e, column.name()))?;
        Ok(sql::quote_text(&self.executor, &STANDARD.encode(sealed)))
    }

    /// Replace stored ciphertext with plaintext in a freshly loaded row.
    fn decrypt_row(&self, row: &mut Row) -> Result<()> {
        for column in row.iter_mut() {
            let Some(key) = column.key_selector() else {
                continue;
            };
            let Some(stored) = column.data(false) else {
                continue;
            };
            if stored.is_empty() || (column.data_type() == DataType::Date && stored == ZERO_DATE) {
                continue;
            }
            let sealed = STANDARD.decode(stored.trim()).map_err(|e| {
                Error::Cipher(CipherError {
                    kind: CipherErrorKind::Corrupt,
                    column: Some(column.name().to_string()),
                    message: format!("stored value is not base64: {}", e),
                })
            })?;
            let cipher = self.cipher_for(column.name())?;
            let plain = cipher
                .decrypt(&sealed, key, column.name())
                .map_err(|e| with_column(e, column.name()))?;
            let plain = String::from_utf8(plain).map_err(|_| {
                Error::Cipher(CipherError {
                    kind: CipherErrorKind::Corrupt,
                    column: Some(column.name().to_string()),
                    message: "decrypted value is not UTF-8".to_string(),
                })
            })?;
            column.load_value(Some(plain));
        }
        Ok(())
    }

    fn cipher_for(&self, column: &str) -> Result<&dyn ColumnCipher> {
        self.cipher.as_deref().ok_or_else(|| {
            Error::Cipher(CipherError {
                kind: CipherErrorKind::NoCipher,
                column: Some(column.to_string()),
                message: "column is encrypted but no cipher is attached".to_string(),
            })
        })
    }

    fn introspection_error(&self, err: Error) -> Error {
        match err {
            Error::NotConnected | Error::Introspection(_) => err,
            other => Error::Introspection(IntrospectionError {
                table: self.table.clone(),
                message: other.to_string(),
                source: Some(Box::new(other)),
            }),
        }
    }

    fn introspection_message(&self, message: &str) -> Error {
        Error::Introspection(IntrospectionError {
            table: self.table.clone(),
            message: message.to_string(),
            source: None,
        })
    }
}

fn with_column(mut err: CipherError, column: &str) -> Error {
    if err.column.is_none() {
        err.column = Some(column.to_string());
    }
    Error::Cipher(err)
}

impl<E: QueryExecutor + fmt::Debug> fmt::Debug for TableAccessor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableAccessor")
            .field("executor", &self.executor)
            .field("table", &self.table)
            .field("config", &self.config)
            .field("cipher", &self.cipher.is_some())
            .field("schema", &self.schema)
            .field("encrypted", &self.encrypted)
            .field("row", &self.row)
            .field("hooks", &self.hooks)
            .finish()
    }
}
