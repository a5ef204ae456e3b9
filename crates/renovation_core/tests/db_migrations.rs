use renovation_core::db::migrations::latest_version;
use renovation_core::db::{open_db, open_db_in_memory, DbError};
use renovation_core::{PersistentStore, SqliteStore};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_kv_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_store");
}

#[test]
fn reopening_store_file_keeps_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("renovation.sqlite3");

    let first = SqliteStore::open(&path).unwrap();
    first.save("rooms", "[1,2,3]");
    drop(first);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    drop(conn);

    let second = SqliteStore::open(&path).unwrap();
    assert_eq!(second.load("rooms").as_deref(), Some("[1,2,3]"));
    second.remove("rooms");
    assert_eq!(second.load("rooms"), None);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = SqliteStore::open(&path).err().unwrap();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn store_reads_degrade_to_absent_when_table_is_gone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.sqlite3");
    let store = SqliteStore::open(&path).unwrap();
    store.save("rooms", "[]");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("DROP TABLE kv_store;").unwrap();
    drop(conn);

    assert!(store.try_load("rooms").is_err());
    assert_eq!(store.load("rooms"), None);
    store.save("rooms", "[]");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
