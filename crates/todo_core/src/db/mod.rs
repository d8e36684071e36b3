//! Task database bootstrap.
//!
//! # Responsibility
//! - Open SQLite connections for the task store and set their pragmas.
//! - Bring the `tasks` schema up to the version this binary expects.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - A returned connection has a `tasks` table with every column the store
//!   reads; nothing touches task rows before that holds.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the task database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A migration step failed; the whole upgrade was rolled back.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// The `tasks` table lacks a column after migrating.
    TasksColumnMissing(&'static str),
}

impl DbError {
    /// Stable code for `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "db_sqlite",
            Self::UnsupportedSchemaVersion { .. } => "db_schema_too_new",
            Self::Migration { .. } => "db_migration_failed",
            Self::TasksColumnMissing(_) => "db_tasks_schema_invalid",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "task database schema v{db_version} is newer than this build (v{latest_supported})"
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "migration v{version} `{name}` failed: {source}"),
            Self::TasksColumnMissing(column) => {
                write!(f, "`tasks` table is missing column `{column}`")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::TasksColumnMissing(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
