//! Task schema upgrades.
//!
//! Each step is a named SQL script. Pending steps run in one transaction;
//! `user_version` is bumped after each so a rolled-back upgrade leaves the
//! old version in place.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_tasks",
    sql: include_str!("0001_init.sql"),
}];

/// Columns the task store selects; checked after every upgrade.
const TASK_COLUMNS: &[&str] = &["id", "title", "description", "creation_date", "completed"];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Upgrades the task schema to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is newer than this build.
/// - `Migration` naming the first step that failed.
/// - `TasksColumnMissing` when the resulting table cannot back the store.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = current_user_version(conn)?;
    let latest = latest_version();

    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    if from < latest {
        let tx = conn.transaction()?;
        for migration in MIGRATIONS.iter().filter(|m| m.version > from) {
            run_step(&tx, migration)?;
        }
        tx.commit()?;
        info!("event=db_migrate module=db status=ok from_version={from} to_version={latest}");
    }

    check_task_columns(conn)
}

/// Reads the schema version recorded in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn run_step(tx: &Transaction<'_>, migration: &Migration) -> DbResult<()> {
    let wrap = |source| DbError::Migration {
        version: migration.version,
        name: migration.name,
        source,
    };
    tx.execute_batch(migration.sql).map_err(wrap)?;
    tx.pragma_update(None, "user_version", migration.version)
        .map_err(wrap)?;
    debug!(
        "event=db_migrate_step module=db status=ok version={} name={}",
        migration.version, migration.name
    );
    Ok(())
}

fn check_task_columns(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('tasks');")?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    match TASK_COLUMNS
        .iter()
        .find(|column| !present.iter().any(|name| name.as_str() == **column))
    {
        Some(column) => Err(DbError::TasksColumnMissing(*column)),
        None => Ok(()),
    }
}
