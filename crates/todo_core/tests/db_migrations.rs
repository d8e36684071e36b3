use todo_core::db::migrations::latest_version;
use todo_core::db::{open_db, open_db_in_memory, DbError};
use todo_core::{SqliteTaskStore, StoreError, TaskStore};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "tasks");
}

#[test]
fn opening_same_database_twice_is_idempotent_and_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO tasks (title, description, creation_date, completed)
             VALUES ('persisted', '', 1700000000000, 0);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let store = SqliteTaskStore::try_new(conn_second).unwrap();
    let records = store.list_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "persisted");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
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
fn failed_migration_names_step_and_keeps_old_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clash.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE VIEW tasks AS SELECT 1 AS id;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::Migration { version, name, .. } => {
            assert_eq!(version, 1);
            assert_eq!(name, "create_tasks");
        }
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), 0);
}

#[test]
fn current_version_with_incomplete_tasks_table_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE tasks (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            creation_date INTEGER NOT NULL
        );
        PRAGMA user_version = {};",
        latest_version()
    ))
    .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert_eq!(err.code(), "db_tasks_schema_invalid");
    assert!(matches!(err, DbError::TasksColumnMissing("completed")));
}

#[test]
fn store_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteTaskStore::try_new(conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_tasks_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteTaskStore::try_new(conn),
        Err(StoreError::MissingRequiredTable("tasks"))
    ));
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
