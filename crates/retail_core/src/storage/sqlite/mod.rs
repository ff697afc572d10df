//! SQLite-backed storage adapters.
//!
//! # Responsibility
//! - Map entities to and from rows of the `customers`, `products`,
//!   `invoices` and `sales` tables.
//! - Translate engine failures into the storage error taxonomy.
//! - Compute report aggregates in SQL.
//!
//! # Invariants
//! - `None` fields are written as SQL NULL; NULL columns read back as `None`.
//! - One statement is prepared per call and dropped before returning.
//! - Foreign-key violations surface as `StorageError::Relation`; every other
//!   failure is `StorageError::Internal`.

use crate::db::schema::{schema_version, target_version};
use crate::model::{Entity, EntityId};
use crate::storage::{InternalCause, StorageError, StorageResult};
use log::{debug, error};
use rusqlite::{ffi, Connection, Params, Row};

mod customer;
mod invoice;
mod product;
mod sale;

pub use customer::SqliteCustomerStorage;
pub use invoice::SqliteInvoiceStorage;
pub use product::SqliteProductStorage;
pub use sale::SqliteSaleStorage;

/// Runs a read-only query and maps every row, discarding partial results on error.
fn query_all<T, P: Params>(
    conn: &Connection,
    entity: Entity,
    sql: &str,
    params: P,
    map_row: impl Fn(&Row<'_>) -> rusqlite::Result<T>,
) -> StorageResult<Vec<T>> {
    let result = (|| -> rusqlite::Result<Vec<T>> {
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(map_row(row)?);
        }
        Ok(items)
    })();

    match result {
        Ok(items) => {
            debug!(
                "event=storage_read_all module=storage backend=sqlite status=ok entity={entity} rows={}",
                items.len()
            );
            Ok(items)
        }
        Err(err) => {
            error!(
                "event=storage_read_all module=storage backend=sqlite status=error entity={entity} error_kind=internal error={err}"
            );
            Err(StorageError::internal(entity, err))
        }
    }
}

/// Executes one INSERT and returns the generated row id.
///
/// `relational` marks tables with foreign keys; only those report
/// `StorageError::Relation`.
fn insert_one<P: Params>(
    conn: &Connection,
    entity: Entity,
    relational: bool,
    sql: &str,
    params: P,
) -> StorageResult<EntityId> {
    let result = insert_row(conn, entity, relational, sql, params);
    if let Err(err) = &result {
        error!(
            "event=storage_create module=storage backend=sqlite status=error entity={entity} error_kind={} error={err}",
            err.kind()
        );
    }
    result
}

fn insert_row<P: Params>(
    conn: &Connection,
    entity: Entity,
    relational: bool,
    sql: &str,
    params: P,
) -> StorageResult<EntityId> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|err| StorageError::internal(entity, err))?;

    let affected = stmt
        .execute(params)
        .map_err(|err| classify_write_error(entity, relational, err))?;
    if affected != 1 {
        return Err(StorageError::internal(
            entity,
            InternalCause::RowsAffected(affected),
        ));
    }

    let id = conn.last_insert_rowid();
    if id <= 0 {
        return Err(StorageError::internal(
            entity,
            InternalCause::MissingGeneratedId,
        ));
    }
    Ok(id)
}

fn classify_write_error(entity: Entity, relational: bool, err: rusqlite::Error) -> StorageError {
    if relational && is_foreign_key_violation(&err) {
        StorageError::Relation { entity, cause: err }
    } else {
        StorageError::internal(entity, err)
    }
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

/// Verifies the connection carries the current schema with `table(columns)`.
fn ensure_connection_ready(
    conn: &Connection,
    entity: Entity,
    columns: &[&str],
) -> StorageResult<()> {
    let table = entity.as_str();
    let not_ready =
        |message: String| StorageError::internal(entity, InternalCause::SchemaNotReady(message));

    let actual_version =
        schema_version(conn).map_err(|err| StorageError::internal(entity, err))?;
    let expected_version = target_version();
    if actual_version != expected_version {
        return Err(not_ready(format!(
            "schema version {actual_version}, expected {expected_version}"
        )));
    }

    if !table_exists(conn, table).map_err(|err| StorageError::internal(entity, err))? {
        return Err(not_ready(format!("missing table `{table}`")));
    }

    let present = table_columns(conn, table).map_err(|err| StorageError::internal(entity, err))?;
    if let Some(missing) = columns
        .iter()
        .copied()
        .find(|column| !present.iter().any(|name| name == column))
    {
        return Err(not_ready(format!("missing column `{table}.{missing}`")));
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get(1)?);
    }
    Ok(columns)
}

/// Reads the `id` column, mapping NULL to the unassigned id.
fn read_id(row: &Row<'_>, column: &str) -> rusqlite::Result<EntityId> {
    Ok(row.get::<_, Option<EntityId>>(column)?.unwrap_or_default())
}
