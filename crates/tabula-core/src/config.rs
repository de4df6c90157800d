//! Per-accessor configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Column limit of a MySQL table, the largest of the supported drivers.
pub const DEFAULT_MAX_COLUMNS: usize = 4096;

/// What to do when a table reports more than one primary-key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeKeyPolicy {
    /// Row-identity operations fail with a composite-key error.
    #[default]
    Reject,
    /// Honour the first key column reported and ignore the rest.
    FirstColumn,
}

/// Settings for one table accessor.
///
/// ```
/// use tabula_core::{CompositeKeyPolicy, TableConfig};
///
/// let config = TableConfig::new()
///     .zero_dates_as_empty(true)
///     .composite_key_policy(CompositeKeyPolicy::FirstColumn);
/// assert!(config.zero_dates_as_empty);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Present `0000-00-00` date values as empty text.
    pub zero_dates_as_empty: bool,
    pub composite_key_policy: CompositeKeyPolicy,
    /// Introspection fails when a table reports more columns than this.
    pub max_columns: usize,
    /// Log every write statement at `info` level.
    pub log_statements: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            zero_dates_as_empty: false,
            composite_key_policy: CompositeKeyPolicy::Reject,
            max_columns: DEFAULT_MAX_COLUMNS,
            log_statements: false,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON document. Missing keys keep their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_columns == 0 {
            return Err(Error::Config("max_columns must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn zero_dates_as_empty(mut self, enabled: bool) -> Self {
        self.zero_dates_as_empty = enabled;
        self
    }

    pub fn composite_key_policy(mut self, policy: CompositeKeyPolicy) -> Self {
        self.composite_key_policy = policy;
        self
    }

    pub fn max_columns(mut self, max: usize) -> Self {
        self.max_columns = max;
        self
    }

    pub fn log_statements(mut self, enabled: bool) -> Self {
        self.log_statements = enabled;
        self
    }
}
