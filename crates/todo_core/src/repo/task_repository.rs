//! Domain-facing task repository.
//!
//! # Responsibility
//! - Translate store calls into domain `Task` values.
//! - Normalize every store fault into `TaskError::Storage`.
//! - Own the live task-list subject and republish it after each mutation.
//!
//! # Invariants
//! - No store fault escapes as anything other than `TaskError`.
//! - A failed mutation does not publish a new list.
//! - Mutations and their republish run under one write lock, so the last
//!   published list always reflects the last completed mutation.
//! - Log lines carry ids and error codes only, never task text.

use crate::model::outcome::Outcome;
use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::repo::mapper::{to_record, to_task};
use crate::repo::task_store::{StoreError, TaskStore};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Message used when a storage fault carries no text of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

pub type TaskResult<T> = Result<T, TaskError>;

/// Live view of the full task list, newest first.
pub type TaskFeed = watch::Receiver<Outcome<Vec<Task>>>;

/// Error surfaced by use-cases and the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    Validation(TaskValidationError),
    InvalidId(TaskId),
    Storage { message: String },
}

impl TaskError {
    /// Wraps a store fault, falling back to the generic message when the
    /// fault renders as empty text.
    pub fn storage(err: &StoreError) -> Self {
        let message = err.to_string();
        let message = if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self::Storage { message }
    }

    /// Stable machine-readable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.code(),
            Self::InvalidId(_) => "invalid_id",
            Self::Storage { .. } => "storage_fault",
        }
    }
}

impl Display for TaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidId(id) => write!(f, "invalid task id: {id}"),
            Self::Storage { message } => write!(f, "{message}"),
        }
    }
}

impl Error for TaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for TaskError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for TaskError {
    fn from(value: StoreError) -> Self {
        Self::storage(&value)
    }
}

/// Repository facade over a `TaskStore`.
pub struct TaskRepository<S: TaskStore> {
    store: S,
    feed: watch::Sender<Outcome<Vec<Task>>>,
    write_lock: Mutex<()>,
}

impl<S: TaskStore> TaskRepository<S> {
    /// Wraps `store` and publishes its current contents.
    pub fn new(store: S) -> Self {
        let (feed, _) = watch::channel(Outcome::Loading);
        let repo = Self {
            store,
            feed,
            write_lock: Mutex::new(()),
        };
        repo.publish();
        repo
    }

    /// Subscribes to the live task list.
    ///
    /// The receiver sees the current list immediately and every later
    /// republish.
    pub fn subscribe(&self) -> TaskFeed {
        self.feed.subscribe()
    }

    pub fn get_task_by_id(&self, id: TaskId) -> TaskResult<Option<Task>> {
        let record = self.store.get_by_id(id).map_err(|err| fault("get", &err))?;
        record
            .map(to_task)
            .transpose()
            .map_err(|err| fault("get", &err))
    }

    /// Inserts `task` and returns the store-assigned id.
    pub fn insert_task(&self, task: &Task) -> TaskResult<TaskId> {
        let _guard = self.lock_writes();
        let id = self
            .store
            .insert(&to_record(task))
            .map_err(|err| fault("insert", &err))?;
        info!("event=task_insert module=repo status=ok task_id={id}");
        self.publish();
        Ok(id)
    }

    pub fn update_task(&self, task: &Task) -> TaskResult<()> {
        let _guard = self.lock_writes();
        self.store
            .update(&to_record(task))
            .map_err(|err| fault("update", &err))?;
        info!("event=task_update module=repo status=ok task_id={}", task.id);
        self.publish();
        Ok(())
    }

    pub fn delete_task(&self, task: &Task) -> TaskResult<()> {
        let _guard = self.lock_writes();
        self.store
            .delete(&to_record(task))
            .map_err(|err| fault("delete", &err))?;
        info!("event=task_delete module=repo status=ok task_id={}", task.id);
        self.publish();
        Ok(())
    }

    pub fn delete_all_tasks(&self) -> TaskResult<()> {
        let _guard = self.lock_writes();
        self.store
            .delete_all()
            .map_err(|err| fault("delete_all", &err))?;
        info!("event=task_delete_all module=repo status=ok");
        self.publish();
        Ok(())
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-reads the store and pushes the result to every subscriber.
    ///
    /// Callers other than `new` must hold the write lock.
    fn publish(&self) {
        let outcome = match self.load_all() {
            Ok(tasks) => {
                debug!(
                    "event=task_feed_publish module=repo status=ok count={}",
                    tasks.len()
                );
                Outcome::Success(tasks)
            }
            Err(err) => Outcome::Error(err),
        };
        self.feed.send_replace(outcome);
    }

    fn load_all(&self) -> TaskResult<Vec<Task>> {
        let records = self.store.list_all().map_err(|err| fault("list", &err))?;
        records
            .into_iter()
            .map(to_task)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| fault("list", &err))
    }
}

fn fault(op: &'static str, err: &StoreError) -> TaskError {
    error!("event=task_{op} module=repo status=error error_code=storage_fault error={err}");
    TaskError::storage(err)
}
