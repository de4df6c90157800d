//! Test fixtures for tabula-table integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use tabula_core::{
    CipherError, CipherErrorKind, ColumnCipher, ColumnInfo, CommandOutcome, DataType, Error,
    FieldMeta, KeySelector, QueryErrorKind, Record, Result, ResultSet,
};

/// An in-memory executor that answers the statements an accessor issues.
///
/// `SELECT * ... = <key>` is served from the row map, any other query from the
/// scripted key list. Commands are recorded; `INSERT` answers with the next
/// generated id, `DELETE` removes the row. Nothing parses column values, so a
/// test that reloads an inserted row seeds it with [`ScriptedExecutor::seed`].
pub struct ScriptedExecutor {
    table: String,
    columns: Vec<ColumnInfo>,
    rows: RefCell<BTreeMap<i64, Vec<Option<String>>>>,
    list_keys: RefCell<Vec<i64>>,
    next_id: Cell<i64>,
    connected: Cell<bool>,
    pub introspections: Cell<usize>,
    pub queries: RefCell<Vec<String>>,
    pub commands: RefCell<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new(table: &str, columns: Vec<ColumnInfo>) -> Self {
        Self {
            table: table.to_string(),
            columns,
            rows: RefCell::new(BTreeMap::new()),
            list_keys: RefCell::new(Vec::new()),
            next_id: Cell::new(100),
            connected: Cell::new(true),
            introspections: Cell::new(0),
            queries: RefCell::new(Vec::new()),
            commands: RefCell::new(Vec::new()),
        }
    }

    pub fn seed(&self, key: i64, values: &[Option<&str>]) {
        self.rows
            .borrow_mut()
            .insert(key, values.iter().map(|v| v.map(str::to_string)).collect());
    }

    pub fn remove(&self, key: i64) {
        self.rows.borrow_mut().remove(&key);
    }

    pub fn script_keys(&self, keys: &[i64]) {
        *self.list_keys.borrow_mut() = keys.to_vec();
    }

    pub fn set_next_id(&self, id: i64) {
        self.next_id.set(id);
    }

    pub fn disconnect(&self) {
        self.connected.set(false);
    }

    pub fn last_command(&self) -> Option<String> {
        self.commands.borrow().last().cloned()
    }

    pub fn command_count(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn fetches(&self) -> usize {
        self.queries
            .borrow()
            .iter()
            .filter(|q| q.starts_with("SELECT *"))
            .count()
    }

    fn fields(&self) -> Vec<FieldMeta> {
        self.columns
            .iter()
            .map(|c| {
                let meta = FieldMeta::new(c.name.clone(), c.data_type).table(self.table.clone());
                if c.primary_key { meta.primary_key() } else { meta }
            })
            .collect()
    }
}

fn trailing_key(sql: &str) -> Option<i64> {
    sql.rsplit("= ").next()?.trim().parse().ok()
}

impl tabula_core::QueryExecutor for ScriptedExecutor {
    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn introspect_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        self.introspections.set(self.introspections.get() + 1);
        if table != self.table {
            return Err(Error::query(
                QueryErrorKind::Query,
                None,
                format!("no such table: {}", table),
            ));
        }
        Ok(self.columns.clone())
    }

    fn execute_query(&self, sql: &str) -> Result<ResultSet> {
        self.queries.borrow_mut().push(sql.to_string());
        if sql.starts_with("SELECT *") {
            let records = trailing_key(sql)
                .and_then(|key| self.rows.borrow().get(&key).cloned())
                .map(|values| vec![Record::new(values)])
                .unwrap_or_default();
            return Ok(ResultSet::new(self.fields(), records));
        }
        let key_field = self
            .columns
            .iter()
            .find(|c| c.primary_key)
            .map(|c| FieldMeta::new(c.name.clone(), c.data_type))
            .unwrap_or_else(|| FieldMeta::new("key", DataType::BigInt));
        let records = self
            .list_keys
            .borrow()
            .iter()
            .map(|k| Record::new(vec![Some(k.to_string())]))
            .collect();
        Ok(ResultSet::new(vec![key_field], records))
    }

    fn execute_command(&self, sql: &str) -> Result<CommandOutcome> {
        self.commands.borrow_mut().push(sql.to_string());
        if sql.starts_with("INSERT") {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            return Ok(CommandOutcome::inserted(1, id));
        }
        let key = trailing_key(sql);
        let exists = key.is_some_and(|k| self.rows.borrow().contains_key(&k));
        if sql.starts_with("DELETE") && exists {
            if let Some(k) = key {
                self.rows.borrow_mut().remove(&k);
            }
        }
        Ok(CommandOutcome::affected(u64::from(exists)))
    }
}

/// `Customers(ID pk, Name, City, Balance, Joined)` with five seeded rows.
pub fn customers() -> ScriptedExecutor {
    let exec = ScriptedExecutor::new(
        "Customers",
        vec![
            ColumnInfo::new("ID", DataType::BigInt, 0).primary_key(),
            ColumnInfo::new("Name", DataType::Text, 1),
            ColumnInfo::new("City", DataType::Text, 2),
            ColumnInfo::new("Balance", DataType::Double, 3),
            ColumnInfo::new("Joined", DataType::Date, 4),
        ],
    );
    exec.seed(1, &[Some("1"), Some("Ada"), Some("Seattle"), Some("10.5"), Some("1999-10-22")]);
    exec.seed(2, &[Some("2"), Some("Bo"), Some("Portland"), Some("0"), Some("0000-00-00")]);
    exec.seed(3, &[Some("3"), Some("Cy"), Some("Seattle"), None, None]);
    exec.seed(4, &[Some("4"), Some("Di"), Some("Tacoma"), Some("7"), None]);
    exec.seed(5, &[Some("5"), Some("Ed"), Some("Seattle"), Some("1.25"), None]);
    exec
}

/// A reversible, unauthenticated stand-in cipher: tags and reverses bytes.
///
/// Ciphertext is `b"enc:"` followed by the reversed plaintext; anything else
/// fails to decrypt as corrupt.
pub struct ReversingCipher;

const TAG: &[u8] = b"enc:";

impl ColumnCipher for ReversingCipher {
    fn encrypt(
        &self,
        plain: &[u8],
        _key: KeySelector,
        _column: &str,
    ) -> std::result::Result<Vec<u8>, CipherError> {
        let mut out = TAG.to_vec();
        out.extend(plain.iter().rev());
        Ok(out)
    }

    fn decrypt(
        &self,
        cipher: &[u8],
        _key: KeySelector,
        column: &str,
    ) -> std::result::Result<Vec<u8>, CipherError> {
        let Some(body) = cipher.strip_prefix(TAG) else {
            return Err(CipherError {
                kind: CipherErrorKind::Corrupt,
                column: Some(column.to_string()),
                message: "missing tag".to_string(),
            });
        };
        Ok(body.iter().rev().copied().collect())
    }
}
