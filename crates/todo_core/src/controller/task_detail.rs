//! Task detail screen controller.
//!
//! Shows a single task by id and handles edit/delete from that screen.

use crate::model::task::{Task, TaskId};
use crate::repo::task_repository::TaskError;
use crate::repo::task_store::TaskStore;
use crate::service::task_use_cases::TaskUseCases;
use log::warn;
use std::sync::Arc;
use tokio::sync::watch;

pub const TASK_NOT_FOUND_MESSAGE: &str = "Task not found";

/// Observable state of the task detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetailUiState {
    pub task: Option<Task>,
    pub is_editing: bool,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub is_success: bool,
}

impl Default for TaskDetailUiState {
    // Loading until the first `load` completes.
    fn default() -> Self {
        Self {
            task: None,
            is_editing: false,
            is_loading: true,
            error_message: None,
            is_success: false,
        }
    }
}

pub struct TaskDetailController<S: TaskStore> {
    use_cases: Arc<TaskUseCases<S>>,
    state: watch::Sender<TaskDetailUiState>,
}

impl<S: TaskStore> TaskDetailController<S> {
    pub fn new(use_cases: Arc<TaskUseCases<S>>) -> Self {
        let (state, _) = watch::channel(TaskDetailUiState::default());
        Self { use_cases, state }
    }

    pub fn state(&self) -> TaskDetailUiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TaskDetailUiState> {
        self.state.subscribe()
    }

    /// Loads the task shown by this screen.
    pub fn load(&self, id: TaskId) {
        self.state.send_modify(|state| state.is_loading = true);
        let result = self.use_cases.get_task_by_id(id);
        log_failure("load", &result);
        self.state.send_modify(|state| {
            state.is_loading = false;
            match result {
                Ok(Some(task)) => {
                    state.task = Some(task);
                    state.error_message = None;
                }
                Ok(None) => {
                    state.task = None;
                    state.error_message = Some(TASK_NOT_FOUND_MESSAGE.to_string());
                }
                Err(err) => state.error_message = Some(err.to_string()),
            }
        });
    }

    pub fn start_editing(&self) {
        self.state.send_modify(|state| state.is_editing = true);
    }

    pub fn cancel_editing(&self) {
        self.state.send_modify(|state| state.is_editing = false);
    }

    pub fn update_task(&self, task: &Task) {
        self.state.send_modify(|state| state.is_loading = true);
        let result = self.use_cases.update_task(task);
        log_failure("update", &result);
        self.state.send_modify(|state| {
            state.is_loading = false;
            match &result {
                Ok(()) => {
                    // The store never rewrites creation_date.
                    let mut shown = task.clone();
                    if let Some(loaded) = state.task.as_ref().filter(|loaded| loaded.id == task.id)
                    {
                        shown.creation_date = loaded.creation_date;
                    }
                    state.task = Some(shown);
                    state.is_editing = false;
                    state.is_success = true;
                    state.error_message = None;
                }
                Err(err) => state.error_message = Some(format!("Failed to update task: {err}")),
            }
        });
    }

    pub fn delete_task(&self, task: &Task) {
        self.state.send_modify(|state| state.is_loading = true);
        let result = self.use_cases.delete_task(task);
        log_failure("delete", &result);
        self.state.send_modify(|state| {
            state.is_loading = false;
            match &result {
                Ok(()) => {
                    state.task = None;
                    state.is_success = true;
                    state.error_message = None;
                }
                Err(err) => state.error_message = Some(format!("Failed to delete task: {err}")),
            }
        });
    }

    /// Shows a failure detected before any use-case call.
    pub fn report_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.state
            .send_modify(|state| state.error_message = Some(message));
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|state| state.error_message = None);
    }

    pub fn clear_success(&self) {
        self.state.send_modify(|state| state.is_success = false);
    }
}

fn log_failure<T>(action: &'static str, result: &Result<T, TaskError>) {
    if let Err(err) = result {
        warn!(
            "event=task_detail_{} module=controller status=error error_code={}",
            action,
            err.code()
        );
    }
}
