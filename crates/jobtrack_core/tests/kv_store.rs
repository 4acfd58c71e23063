use jobtrack_core::db::{open_db, open_db_in_memory};
use jobtrack_core::{KeyValueStore, SqliteKvStore};

#[test]
fn get_missing_key_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);

    assert_eq!(kv.get("jobApplications").unwrap(), None);
}

#[test]
fn set_overwrites_previous_value() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);

    kv.set("theme", "dark").unwrap();
    kv.set("theme", "light").unwrap();

    assert_eq!(kv.get("theme").unwrap().as_deref(), Some("light"));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries WHERE key = 'theme';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn values_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kv.db");

    {
        let conn = open_db(&path).unwrap();
        SqliteKvStore::new(&conn).set("theme", "dark").unwrap();
    }

    let conn = open_db(&path).unwrap();
    let kv = SqliteKvStore::new(&conn);
    assert_eq!(kv.get("theme").unwrap().as_deref(), Some("dark"));
}
