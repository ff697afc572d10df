//! Numbered schema steps for the retail tables.
//!
//! The step number a database has reached lives in `PRAGMA user_version`.
//! Steps are listed in ascending order and never edited once released; a
//! schema change is a new step.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    script: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "retail_tables",
    script: include_str!("0001_retail.sql"),
}];

/// Schema version a freshly opened connection ends up at.
pub fn target_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Reads the schema version recorded in the database file.
pub fn schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
}

/// Brings `conn` up to [`target_version`].
///
/// All pending steps share one transaction: either every step lands together
/// with its `user_version` bump or the file keeps its previous schema.
pub fn upgrade(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let target = target_version();
    if found > target {
        return Err(DbError::SchemaTooNew {
            found,
            supported: target,
        });
    }

    let mut pending = SCHEMA_STEPS.iter().skip_while(|step| step.version <= found).peekable();
    if pending.peek().is_none() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.script)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Upgrade {
                version: step.version,
                source,
            })?;
        info!(
            "event=schema_upgrade module=db status=ok version={} step={}",
            step.version, step.name
        );
    }
    tx.commit()?;
    Ok(())
}
