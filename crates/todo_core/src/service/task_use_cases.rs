//! Task use-cases.
//!
//! # Responsibility
//! - Gate every mutation through `Task::validate` before it reaches storage.
//! - Pass reads through with minimal guarding.
//!
//! # Invariants
//! - Validation failures never touch the repository.
//! - `get_task_by_id` rejects non-positive ids without a store lookup.

use crate::model::task::{Task, TaskId};
use crate::repo::task_repository::{TaskError, TaskFeed, TaskRepository, TaskResult};
use crate::repo::task_store::TaskStore;
use log::warn;

/// Validated business operations over a task repository.
pub struct TaskUseCases<S: TaskStore> {
    repo: TaskRepository<S>,
}

impl<S: TaskStore> TaskUseCases<S> {
    pub fn new(repo: TaskRepository<S>) -> Self {
        Self { repo }
    }

    /// Live task list, unfiltered, newest first.
    pub fn get_all_tasks(&self) -> TaskFeed {
        self.repo.subscribe()
    }

    /// Looks up one task. `Ok(None)` means no such task.
    pub fn get_task_by_id(&self, id: TaskId) -> TaskResult<Option<Task>> {
        if id <= 0 {
            warn!("event=task_get module=service status=rejected error_code=invalid_id");
            return Err(TaskError::InvalidId(id));
        }
        self.repo.get_task_by_id(id)
    }

    /// Validates and inserts a new task, returning the assigned id.
    pub fn add_task(&self, task: &Task) -> TaskResult<TaskId> {
        validate("add", task)?;
        self.repo.insert_task(task)
    }

    /// Validates the full edited task, then persists it under the same id.
    pub fn update_task(&self, task: &Task) -> TaskResult<()> {
        validate("update", task)?;
        self.repo.update_task(task)
    }

    pub fn delete_task(&self, task: &Task) -> TaskResult<()> {
        self.repo.delete_task(task)
    }

    pub fn delete_all_tasks(&self) -> TaskResult<()> {
        self.repo.delete_all_tasks()
    }
}

fn validate(op: &'static str, task: &Task) -> TaskResult<()> {
    task.validate().map_err(|err| {
        warn!(
            "event=task_{} module=service status=rejected error_code={}",
            op,
            err.code()
        );
        TaskError::Validation(err)
    })
}
