//! Task record store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide raw CRUD over the `tasks` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `list_all` orders by `creation_date DESC, id DESC`.
//! - Ids come from `AUTOINCREMENT` and are never reused.
//! - `creation_date` is written on insert only.
//! - Read paths reject malformed rows instead of masking them.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::task::TaskId;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    creation_date,
    completed
FROM tasks";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persisted shape of a task row.
///
/// `creation_date` is Unix epoch milliseconds; `id == 0` on insert asks the
/// store to assign one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub creation_date: i64,
    pub completed: bool,
}

/// Storage fault raised by a `TaskStore`.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
    LockPoisoned,
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::LockPoisoned => write!(f, "task store connection lock poisoned"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw persistence contract for task records.
pub trait TaskStore: Send + Sync {
    /// Returns every record, newest creation first.
    fn list_all(&self) -> StoreResult<Vec<TaskRecord>>;
    fn get_by_id(&self, id: TaskId) -> StoreResult<Option<TaskRecord>>;
    /// Inserts a record and returns its id.
    ///
    /// A record with `id > 0` replaces any row with that id.
    fn insert(&self, record: &TaskRecord) -> StoreResult<TaskId>;
    /// Rewrites title, description and completion of an existing row.
    ///
    /// `creation_date` is never rewritten. `NotFound` when the id is unknown.
    fn update(&self, record: &TaskRecord) -> StoreResult<()>;
    /// Deletes by id. Deleting a missing row is a no-op.
    fn delete(&self, record: &TaskRecord) -> StoreResult<()>;
    fn delete_all(&self) -> StoreResult<()>;
}

/// SQLite-backed task store owning its connection.
pub struct SqliteTaskStore {
    conn: Mutex<Connection>,
}

impl SqliteTaskStore {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` is not the latest.
    /// - `MissingRequiredTable` when the `tasks` table is absent.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        let actual_version = current_user_version(&conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let has_tasks: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'tasks'
            );",
            [],
            |row| row.get(0),
        )?;
        if !has_tasks {
            return Err(StoreError::MissingRequiredTable("tasks"));
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl TaskStore for SqliteTaskStore {
    fn list_all(&self) -> StoreResult<Vec<TaskRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{TASK_SELECT_SQL} ORDER BY creation_date DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_task_row(row)?);
        }

        Ok(records)
    }

    fn get_by_id(&self, id: TaskId) -> StoreResult<Option<TaskRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn insert(&self, record: &TaskRecord) -> StoreResult<TaskId> {
        let conn = self.lock()?;
        let explicit_id = (record.id > 0).then_some(record.id);
        conn.execute(
            "INSERT OR REPLACE INTO tasks (
                id,
                title,
                description,
                creation_date,
                completed
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                explicit_id,
                record.title.as_str(),
                record.description.as_str(),
                record.creation_date,
                bool_to_int(record.completed),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn update(&self, record: &TaskRecord) -> StoreResult<()> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                completed = ?3
             WHERE id = ?4;",
            params![
                record.title.as_str(),
                record.description.as_str(),
                bool_to_int(record.completed),
                record.id,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(record.id));
        }

        Ok(())
    }

    fn delete(&self, record: &TaskRecord) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM tasks WHERE id = ?1;", [record.id])?;
        Ok(())
    }

    fn delete_all(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM tasks;", [])?;
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<TaskRecord> {
    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    Ok(TaskRecord {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        creation_date: row.get("creation_date")?,
        completed,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
