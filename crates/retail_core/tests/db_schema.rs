use retail_core::db::schema::{schema_version, target_version};
use retail_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_retail_tables() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), target_version());
    for table in ["customers", "products", "invoices", "sales"] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn reopening_file_database_keeps_schema_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("retail.sqlite3");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO products (description, price) VALUES ('Chair', 12.5);",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second).unwrap(), target_version());
    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM products;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, target_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn newer_schema_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(err.to_string().contains("schema 999"));

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 999);
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'customers';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 0);
}

#[test]
fn failed_schema_step_rolls_back_and_names_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clash.sqlite3");

    // A legacy `sales` table without `product_id` makes the step's index creation fail.
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE sales (id INTEGER PRIMARY KEY);")
        .unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::Upgrade { version, .. } => assert_eq!(version, 1),
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 0);
    let customers: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'customers';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(customers, 0);
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
