//! Task list screen controller.
//!
//! # Responsibility
//! - Hold task list screen state (dialog, selection, loading, errors).
//! - Route UI events through use-cases and republish the resulting state.
//! - Mirror the repository task feed into `TaskListUiState::tasks`.
//!
//! # Invariants
//! - Use-case failures only set `error_message`; they never stop the feed.
//! - `is_loading` is true exactly while a use-case call is in flight.
//! - Adding with a blank title is ignored without touching the use-cases.

use crate::model::outcome::Outcome;
use crate::model::task::Task;
use crate::repo::task_repository::{TaskError, TaskFeed};
use crate::repo::task_store::TaskStore;
use crate::service::task_use_cases::TaskUseCases;
use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Observable state of the task list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListUiState {
    pub tasks: Vec<Task>,
    pub is_adding_task_dialog_open: bool,
    pub selected_task_for_edit: Option<Task>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub is_success: bool,
}

/// UI events accepted by the task list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListEvent {
    OpenAddDialog,
    DismissAddDialog,
    SelectTask(Option<Task>),
    Add { title: String, description: String },
    Update(Task),
    ToggleComplete(Task),
    Delete(Task),
    DeleteAll,
    ClearError,
    ClearSuccess,
}

pub struct TaskListController<S: TaskStore> {
    use_cases: Arc<TaskUseCases<S>>,
    state: watch::Sender<TaskListUiState>,
    feed: Mutex<TaskFeed>,
}

impl<S: TaskStore> TaskListController<S> {
    /// Creates a controller already showing the current task list.
    pub fn new(use_cases: Arc<TaskUseCases<S>>) -> Self {
        let mut feed = use_cases.get_all_tasks();
        let initial = feed.borrow_and_update().clone();
        let (state, _) = watch::channel(TaskListUiState::default());
        let controller = Self {
            use_cases,
            state,
            feed: Mutex::new(feed),
        };
        controller.apply_feed(initial);
        controller
    }

    /// Snapshot of the current screen state.
    pub fn state(&self) -> TaskListUiState {
        self.state.borrow().clone()
    }

    /// Receives every state change made by this controller.
    pub fn subscribe(&self) -> watch::Receiver<TaskListUiState> {
        self.state.subscribe()
    }

    pub fn dispatch(&self, event: TaskListEvent) {
        match event {
            TaskListEvent::OpenAddDialog => self.open_add_dialog(),
            TaskListEvent::DismissAddDialog => self.dismiss_add_dialog(),
            TaskListEvent::SelectTask(task) => self.select_task(task),
            TaskListEvent::Add { title, description } => self.add_task(&title, &description),
            TaskListEvent::Update(task) => self.update_task(&task),
            TaskListEvent::ToggleComplete(task) => self.toggle_complete(&task),
            TaskListEvent::Delete(task) => self.delete_task(&task),
            TaskListEvent::DeleteAll => self.delete_all_tasks(),
            TaskListEvent::ClearError => self.clear_error(),
            TaskListEvent::ClearSuccess => self.clear_success(),
        }
    }

    pub fn open_add_dialog(&self) {
        self.state
            .send_modify(|state| state.is_adding_task_dialog_open = true);
    }

    pub fn dismiss_add_dialog(&self) {
        self.state
            .send_modify(|state| state.is_adding_task_dialog_open = false);
    }

    pub fn select_task(&self, task: Option<Task>) {
        self.state
            .send_modify(|state| state.selected_task_for_edit = task);
    }

    /// Creates a task from dialog input.
    ///
    /// A blank title is ignored; the add action is expected to be disabled
    /// in that case.
    pub fn add_task(&self, title: &str, description: &str) {
        if title.trim().is_empty() {
            debug!("event=task_list_add module=controller status=skipped reason=blank_title");
            return;
        }

        self.begin();
        let result = self.use_cases.add_task(&Task::new(title, description));
        self.finish("add", result, |state, outcome| match outcome {
            Ok(_) => {
                state.is_adding_task_dialog_open = false;
                state.is_success = true;
            }
            Err(err) => state.error_message = Some(format!("Failed to add task: {err}")),
        });
    }

    /// Persists an edited task; the selection is kept when it fails.
    pub fn update_task(&self, task: &Task) {
        self.begin();
        let result = self.use_cases.update_task(task);
        self.finish("update", result, |state, outcome| match outcome {
            Ok(()) => {
                state.selected_task_for_edit = None;
                state.is_success = true;
            }
            Err(err) => state.error_message = Some(err.to_string()),
        });
    }

    pub fn toggle_complete(&self, task: &Task) {
        self.begin();
        let result = self.use_cases.update_task(&task.toggled());
        self.finish("toggle", result, |state, outcome| {
            if let Err(err) = outcome {
                state.error_message = Some(err.to_string());
            }
        });
    }

    pub fn delete_task(&self, task: &Task) {
        self.begin();
        let result = self.use_cases.delete_task(task);
        let deleted_id = task.id;
        self.finish("delete", result, |state, outcome| match outcome {
            Ok(()) => {
                let was_selected = state
                    .selected_task_for_edit
                    .as_ref()
                    .is_some_and(|selected| selected.id == deleted_id);
                if was_selected {
                    state.selected_task_for_edit = None;
                }
                state.is_success = true;
            }
            Err(err) => state.error_message = Some(err.to_string()),
        });
    }

    pub fn delete_all_tasks(&self) {
        self.begin();
        let result = self.use_cases.delete_all_tasks();
        self.finish("delete_all", result, |state, outcome| match outcome {
            Ok(()) => {
                state.selected_task_for_edit = None;
                state.is_success = true;
            }
            Err(err) => state.error_message = Some(err.to_string()),
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

    /// Pulls a pending feed emission into the state, if any.
    ///
    /// Returns whether a new task list was applied.
    pub fn sync_tasks(&self) -> bool {
        let outcome = {
            let mut feed = self.lock_feed();
            if !feed.has_changed().unwrap_or(false) {
                return false;
            }
            let outcome = feed.borrow_and_update().clone();
            outcome
        };
        self.apply_feed(outcome);
        true
    }

    /// Applies every feed emission until the repository is dropped.
    pub async fn follow_tasks(&self) {
        let mut feed = self.lock_feed().clone();
        while feed.changed().await.is_ok() {
            let outcome = feed.borrow_and_update().clone();
            self.apply_feed(outcome);
        }
        debug!("event=task_list_follow module=controller status=closed");
    }

    fn apply_feed(&self, outcome: Outcome<Vec<Task>>) {
        self.state.send_modify(|state| match outcome {
            Outcome::Success(tasks) => state.tasks = tasks,
            Outcome::Error(err) => {
                state.tasks = Vec::new();
                state.error_message = Some(err.to_string());
            }
            Outcome::Loading => state.tasks = Vec::new(),
        });
    }

    fn begin(&self) {
        self.state.send_modify(|state| state.is_loading = true);
    }

    fn finish<T>(
        &self,
        action: &'static str,
        result: Result<T, TaskError>,
        apply: impl FnOnce(&mut TaskListUiState, &Result<T, TaskError>),
    ) {
        if let Err(err) = &result {
            warn!(
                "event=task_list_{} module=controller status=error error_code={}",
                action,
                err.code()
            );
        }
        self.sync_tasks();
        self.state.send_modify(|state| {
            state.is_loading = false;
            apply(state, &result);
        });
    }

    fn lock_feed(&self) -> MutexGuard<'_, TaskFeed> {
        self.feed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
