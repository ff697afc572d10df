//! Relational store for the retail entities.
//!
//! Connections handed out by [`open_db`] and [`open_db_in_memory`] enforce
//! foreign keys and already carry the newest schema known to this build,
//! so the SQLite adapters can assume the four tables exist.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or upgrading the retail database.
#[derive(Debug)]
pub enum DbError {
    /// Opening the file or setting connection pragmas failed.
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build; it is left untouched.
    SchemaTooNew { found: u32, supported: u32 },
    /// A schema step failed; the upgrade transaction was rolled back.
    Upgrade {
        version: u32,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "retail database error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "retail database is at schema {found}, this build only knows up to {supported}"
            ),
            Self::Upgrade { version, source } => {
                write!(f, "upgrading retail database to schema {version} failed: {source}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Upgrade { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
