use fionaverse_core::db::migrations::{current_user_version, latest_version};
use fionaverse_core::db::{open_db, open_db_in_memory, DbError};
use fionaverse_core::{SqliteBackend, StorageBackend};
use rusqlite::Connection;

#[test]
fn in_memory_db_is_fully_migrated() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert!(column_exists(&conn, "kv_entries", "value_bytes"));
}

#[test]
fn reopening_file_db_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fionaverse.sqlite3");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO kv_entries (key, value, value_bytes) VALUES ('bio', '\"hi\"', 4);",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(current_user_version(&second).unwrap(), latest_version());
    let rows: i64 = second
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn writes_record_value_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sizes.sqlite3");

    let backend = SqliteBackend::open(&path, None).unwrap();
    backend.write("theme", "\"aurora\"").unwrap();
    backend.write("bio", "\"✨\"").unwrap();
    drop(backend);

    let conn = open_db(&path).unwrap();
    let bytes: i64 = conn
        .query_row(
            "SELECT value_bytes FROM kv_entries WHERE key = 'bio';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(bytes, 5);
    assert_eq!(
        SqliteBackend::from_connection(conn, None)
            .used_bytes()
            .unwrap(),
        "\"aurora\"".len() + 5
    );
}

#[test]
fn missing_store_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site").join("data").join("store.sqlite3");

    let conn = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert!(path.exists());
}

#[test]
fn store_directory_blocked_by_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("site");
    std::fs::write(&blocker, b"not a directory").unwrap();

    match open_db(blocker.join("store.sqlite3")).unwrap_err() {
        DbError::CreateDir { path, .. } => assert_eq!(path, blocker),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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

fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names.iter().any(|name| name == column)
}
