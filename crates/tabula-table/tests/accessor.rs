mod fixtures;

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use fixtures::{ReversingCipher, ScriptedExecutor, customers};
use tabula_core::{
    CipherErrorKind, ColumnInfo, DataType, Error, KeySelector, PrimaryKeyErrorKind, TableConfig,
};
use tabula_table::TableAccessor;

fn accessor(exec: &ScriptedExecutor) -> TableAccessor<&ScriptedExecutor> {
    TableAccessor::new(exec, "Customers").unwrap()
}

#[test]
fn introspection_runs_once_per_accessor() {
    let exec = customers();
    let mut acc = accessor(&exec);
    acc.get(1).unwrap();
    acc.set_value("City", "Olympia").unwrap();
    acc.upd(false).unwrap();
    acc.clear_data().unwrap();
    acc.get(2).unwrap();
    assert_eq!(exec.introspections.get(), 1);

    // A second accessor introspects for itself.
    let mut other = accessor(&exec);
    other.introspect().unwrap();
    assert_eq!(exec.introspections.get(), 2);
}

#[test]
fn get_loads_row_with_equal_baseline() {
    let exec = customers();
    let mut acc = accessor(&exec);
    assert_eq!(acc.get(1).unwrap(), Some(1));
    assert_eq!(acc.get_str("Name", false).unwrap(), Some("Ada"));
    assert_eq!(acc.get_f64("Balance", false).unwrap(), 10.5);
    for column in acc.row() {
        assert_eq!(column.data(true), column.data(false));
    }
    assert_eq!(
        exec.queries.borrow().last().map(String::as_str),
        Some("SELECT * FROM \"Customers\" WHERE \"ID\" = 1")
    );
}

#[test]
fn get_missing_key_returns_none() {
    let exec = customers();
    let mut acc = accessor(&exec);
    acc.get(1).unwrap();
    assert_eq!(acc.get(99).unwrap(), None);
    assert_eq!(acc.get_str("Name", false).unwrap(), None);
    assert_eq!(acc.row().len(), 5);
}

#[test]
fn update_without_dirty_columns_writes_nothing() {
    let exec = customers();
    let mut acc = accessor(&exec);
    let updates = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&updates);
    acc.on_update(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    acc.get(3).unwrap();
    assert_eq!(acc.upd(true).unwrap(), 3);

    // Setting a value back to what was loaded is not a change.
    acc.set_value("City", "Tacoma").unwrap();
    acc.set_value("City", "Seattle").unwrap();
    assert_eq!(acc.upd(true).unwrap(), 3);

    assert_eq!(exec.command_count(), 0);
    assert_eq!(updates.load(Ordering::SeqCst), 0);
}

#[test]
fn update_writes_only_the_changed_column() {
    let exec = customers();
    let mut acc = accessor(&exec);
    acc.get(1).unwrap();
    acc.set_value("City", "Portland").unwrap();
    assert_eq!(acc.upd(false).unwrap(), 1);

    assert_eq!(
        exec.last_command().unwrap(),
        "UPDATE \"Customers\" SET \"City\" = 'Portland' WHERE \"ID\" = 1"
    );
    // The written value became the new baseline.
    assert_eq!(acc.get_str("City", true).unwrap(), Some("Portland"));
    assert_eq!(acc.row().changed_columns().count(), 0);
}

#[test]
fn update_keys_by_loaded_value_when_key_changes() {
    let exec = customers();
    let mut acc = accessor(&exec);
    acc.get(4).unwrap();
    acc.set_value("ID", 40_i64).unwrap();
    acc.upd(false).unwrap();
    assert_eq!(
        exec.last_command().unwrap(),
        "UPDATE \"Customers\" SET \"ID\" = 40 WHERE \"ID\" = 4"
    );
}

#[test]
fn update_with_auto_get_reloads_and_runs_hook() {
    let exec = customers();
    let mut acc = accessor(&exec);
    let key = Arc::new(AtomicI64::new(0));
    let seen = Arc::clone(&key);
    acc.on_update(move |e| seen.store(e.key.unwrap_or(-1), Ordering::SeqCst));

    acc.get(5).unwrap();
    let fetches = exec.fetches();
    acc.set_value("Balance", 2.5).unwrap();
    acc.upd(true).unwrap();

    assert_eq!(exec.fetches(), fetches + 1);
    assert_eq!(key.load(Ordering::SeqCst), 5);
}

#[test]
fn update_without_loaded_row_fails() {
    let exec = customers();
    let mut acc = accessor(&exec);
    acc.set_value("City", "Nowhere").unwrap();
    let err = acc.upd(true).unwrap_err();
    assert!(matches!(
        err,
        Error::PrimaryKey(ref e) if e.kind == PrimaryKeyErrorKind::NotLoaded
    ));
    assert_eq!(exec.command_count(), 0);
}

#[test]
fn insert_omits_untouched_columns() {
    let exec = customers();
    let mut acc = accessor(&exec);
    acc.clear_data().unwrap();
    acc.set_value("Name", "Flo").unwrap();
    acc.set_value("Balance", 3).unwrap();
    let key = acc.ins(false).unwrap();

    assert_eq!(key, 100);
    assert_eq!(
        exec.last_command().unwrap(),
        "INSERT INTO \"Customers\" (\"Name\", \"Balance\") VALUES ('Flo', 3)"
    );
    // The generated key lands in the working row so it can be updated.
    assert_eq!(acc.get_i64("ID", true).unwrap(), 100);
    acc.set_value("City", "Boise").unwrap();
    acc.upd(false).unwrap();
    assert_eq!(
        exec.last_command().unwrap(),
        "UPDATE \"Customers\" SET \"City\" = 'Boise' WHERE \"ID\" = 100"
    );
}

#[test]
fn insert_writes_explicit_null() {
    let exec = customers();
    let mut acc = accessor(&exec);
    acc.clear_data().unwrap();
    acc.set_value("Name", "Gus").unwrap();
    acc.set_null("City").unwrap();
    acc.ins(false).unwrap();
    assert_eq!(
        exec.last_command().unwrap(),
        "INSERT INTO \"Customers\" (\"Name\", \"City\") VALUES ('Gus', NULL)"
    );
}

#[test]
fn insert_with_auto_get_reloads_generated_values() {
    let exec = customers();
    exec.set_next_id(6);
    exec.seed(6, &[Some("6"), Some("Hal"), None, Some("0"), Some("2024-01-31")]);
    let mut acc = accessor(&exec);
    let inserted = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&inserted);
    acc.on_insert(move |e| {
        *seen.lock().unwrap() = Some((e.key, e.row.value("Joined").map(str::to_string)));
    });

    acc.clear_data().unwrap();
    acc.set_value("Name", "Hal").unwrap();
    assert_eq!(acc.ins(true).unwrap(), 6);

    assert_eq!(acc.get_str("Joined", false).unwrap(), Some("2024-01-31"));
    assert_eq!(
        acc.get_date("Joined", false).unwrap(),
        chrono::NaiveDate::from_ymd_opt(2024, 1, 31)
    );
    assert_eq!(
        *inserted.lock().unwrap(),
        Some((Some(6), Some("2024-01-31".to_string())))
    );
}

#[test]
fn delete_requires_a_key() {
    let exec = customers();
    let mut acc = accessor(&exec);
    let err = acc.del(None).unwrap_err();
    assert!(err.is_primary_key());
    assert_eq!(exec.command_count(), 0);
}

#[test]
fn delete_by_loaded_or_explicit_key() {
    let exec = customers();
    let mut acc = accessor(&exec);
    let deleted = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&deleted);
    acc.on_delete(move |e| seen.lock().unwrap().extend(e.key));

    acc.get(2).unwrap();
    assert_eq!(acc.del(None).unwrap(), 1);
    assert_eq!(
        exec.last_command().unwrap(),
        "DELETE FROM \"Customers\" WHERE \"ID\" = 2"
    );
    assert_eq!(acc.del(Some(4)).unwrap(), 1);
    assert_eq!(acc.del(Some(4)).unwrap(), 0);
    assert_eq!(*deleted.lock().unwrap(), vec![2, 4, 4]);
}

#[test]
fn encrypted_column_is_plaintext_in_memory_and_ciphertext_in_sql() {
    let exec = customers();
    let mut acc = accessor(&exec).with_cipher(Arc::new(ReversingCipher));
    acc.set_encrypted_column("Name", KeySelector::PerColumn).unwrap();

    acc.clear_data().unwrap();
    acc.set_value("Name", "4111111111111111").unwrap();
    assert_eq!(acc.get_str("Name", false).unwrap(), Some("4111111111111111"));
    acc.ins(false).unwrap();

    let sealed = STANDARD.encode(b"enc:1111111111111114");
    let sql = exec.last_command().unwrap();
    assert!(sql.contains(&sealed), "{sql}");
    assert!(!sql.contains("4111111111111111"), "{sql}");

    // Reloading decrypts back to the plaintext.
    exec.seed(100, &[Some("100"), Some(sealed.as_str()), None, None, None]);
    acc.get(100).unwrap();
    assert_eq!(acc.get_str("Name", false).unwrap(), Some("4111111111111111"));
    assert_eq!(acc.get_str("Name", true).unwrap(), Some("4111111111111111"));

    // An update that does not touch the encrypted column leaves it out.
    acc.set_value("City", "Reno").unwrap();
    acc.upd(false).unwrap();
    assert_eq!(
        exec.last_command().unwrap(),
        "UPDATE \"Customers\" SET \"City\" = 'Reno' WHERE \"ID\" = 100"
    );
}

#[test]
fn corrupt_ciphertext_fails_the_fetch() {
    let exec = customers();
    let mut acc = accessor(&exec).with_cipher(Arc::new(ReversingCipher));
    acc.set_encrypted_column("Name", KeySelector::Shared).unwrap();

    // "Ada" is neither base64 of a tagged value nor anything the cipher made.
    let err = acc.get(1).unwrap_err();
    assert!(matches!(
        err,
        Error::Cipher(ref e) if e.kind == CipherErrorKind::Corrupt && e.column.as_deref() == Some("Name")
    ));
    // The stored form never reaches the caller as if it were plaintext.
    assert_eq!(acc.get_str("Name", false).unwrap(), None);
}

#[test]
fn disconnected_executor_fails_fast() {
    let exec = customers();
    let mut acc = accessor(&exec);
    acc.get(1).unwrap();
    exec.disconnect();
    acc.set_value("City", "Yakima").unwrap();
    assert!(acc.upd(false).unwrap_err().is_not_connected());
    assert!(acc.ins(false).unwrap_err().is_not_connected());
    assert!(acc.del(None).unwrap_err().is_not_connected());
    assert_eq!(exec.command_count(), 0);
}

#[test]
fn unknown_table_is_an_introspection_error() {
    let exec = customers();
    let mut acc = TableAccessor::new(&exec, "Orders").unwrap();
    let err = acc.introspect().unwrap_err();
    assert!(matches!(err, Error::Introspection(ref e) if e.table == "Orders"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn zero_dates_are_presented_empty_when_configured() {
    let exec = customers();
    let config = TableConfig::new().zero_dates_as_empty(true);
    let mut acc = TableAccessor::with_config(&exec, "Customers", config).unwrap();
    acc.get(2).unwrap();
    assert_eq!(acc.get_str("Joined", false).unwrap(), Some(""));
    assert_eq!(acc.column("Joined").unwrap().data(false), Some("0000-00-00"));

    let mut plain = accessor(&exec);
    plain.get(2).unwrap();
    assert_eq!(plain.get_str("Joined", false).unwrap(), Some("0000-00-00"));
}

#[test]
fn tables_without_a_key_still_accept_inserts() {
    let exec = ScriptedExecutor::new(
        "events",
        vec![
            ColumnInfo::new("name", DataType::Text, 0),
            ColumnInfo::new("at", DataType::DateTime, 1),
        ],
    );
    let mut acc = TableAccessor::new(&exec, "events").unwrap();
    acc.set_value("name", "boot").unwrap();
    assert_eq!(acc.ins(true).unwrap(), 100);
    assert_eq!(
        exec.last_command().unwrap(),
        "INSERT INTO \"events\" (\"name\") VALUES ('boot')"
    );
    assert!(acc.get(100).unwrap_err().is_primary_key());
}

#[test]
fn insert_reports_the_written_key_over_a_generated_id() {
    let exec = customers();
    exec.set_next_id(900);
    let mut acc = accessor(&exec);
    acc.clear_data().unwrap();
    acc.set_value("ID", 42).unwrap();
    acc.set_value("Name", "Ivy").unwrap();

    assert_eq!(acc.ins(false).unwrap(), 42);
    assert_eq!(acc.get_i64("ID", false).unwrap(), 42);
    assert_eq!(acc.get_i64("ID", true).unwrap(), 42);

    // The reload fetches the written key, not the executor's identity.
    exec.seed(43, &[Some("43"), Some("Jo"), None, None, None]);
    acc.clear_data().unwrap();
    acc.set_value("ID", 43).unwrap();
    acc.set_value("Name", "Jo").unwrap();
    assert_eq!(acc.ins(true).unwrap(), 43);
    assert_eq!(
        exec.queries.borrow().last().map(String::as_str),
        Some("SELECT * FROM \"Customers\" WHERE \"ID\" = 43")
    );
    assert_eq!(acc.get_str("Name", false).unwrap(), Some("Jo"));
}

#[test]
fn failed_reload_after_insert_still_reports_key_and_runs_hook() {
    let exec = customers();
    exec.set_next_id(7);
    // Stored form the cipher cannot open, so the reload fails.
    exec.seed(7, &[Some("7"), Some("not sealed"), None, None, None]);
    let mut acc = accessor(&exec).with_cipher(Arc::new(ReversingCipher));
    acc.set_encrypted_column("Name", KeySelector::Shared).unwrap();
    let inserted = Arc::new(AtomicI64::new(0));
    let seen = Arc::clone(&inserted);
    acc.on_insert(move |e| seen.store(e.key.unwrap_or(-1), Ordering::SeqCst));

    acc.clear_data().unwrap();
    acc.set_value("Name", "Kai").unwrap();
    assert_eq!(acc.ins(true).unwrap(), 7);
    assert_eq!(exec.command_count(), 1);
    assert_eq!(inserted.load(Ordering::SeqCst), 7);
}
