//! Core domain logic for the to-do list app.
//! UI front ends (FFI bridge, CLI) only talk to controllers and use-cases.

pub mod app;
pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use app::TodoApp;
pub use config::AppConfig;
pub use controller::task_detail::{TaskDetailController, TaskDetailUiState};
pub use controller::task_list::{TaskListController, TaskListEvent, TaskListUiState};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::outcome::Outcome;
pub use model::task::{
    Task, TaskId, TaskValidationError, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH,
};
pub use repo::task_repository::{TaskError, TaskFeed, TaskRepository, TaskResult};
pub use repo::task_store::{SqliteTaskStore, StoreError, StoreResult, TaskRecord, TaskStore};
pub use service::task_use_cases::TaskUseCases;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
