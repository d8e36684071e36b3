//! Composition root.
//!
//! # Responsibility
//! - Wire store → repository → use-cases → controllers by hand.
//! - Give front ends (FFI, CLI) one place to build the object graph.

use crate::config::AppConfig;
use crate::controller::task_detail::TaskDetailController;
use crate::controller::task_list::TaskListController;
use crate::db::{open_db, open_db_in_memory};
use crate::repo::task_repository::TaskRepository;
use crate::repo::task_store::{SqliteTaskStore, StoreError};
use crate::service::task_use_cases::TaskUseCases;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

/// Fully wired application backed by SQLite.
pub struct TodoApp {
    use_cases: Arc<TaskUseCases<SqliteTaskStore>>,
}

impl TodoApp {
    /// Opens the database named by `config`.
    pub fn open(config: &AppConfig) -> Result<Self, StoreError> {
        Self::open_path(&config.db_path)
    }

    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens a fresh, private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(open_db_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = SqliteTaskStore::try_new(conn)?;
        let repo = TaskRepository::new(store);
        Ok(Self {
            use_cases: Arc::new(TaskUseCases::new(repo)),
        })
    }

    pub fn use_cases(&self) -> Arc<TaskUseCases<SqliteTaskStore>> {
        Arc::clone(&self.use_cases)
    }

    pub fn task_list_controller(&self) -> TaskListController<SqliteTaskStore> {
        TaskListController::new(self.use_cases())
    }

    pub fn task_detail_controller(&self) -> TaskDetailController<SqliteTaskStore> {
        TaskDetailController::new(self.use_cases())
    }
}
