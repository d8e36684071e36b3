//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task list and task detail screens to Dart via FRB.
//! - Own the process-wide composition root used by those screens.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every action returns the full screen state after the action.
//! - Actions are plain (non-`sync`) FRB functions so Dart awaits them off
//!   the UI isolate; trivial state reads stay `sync`.

use log::{error, warn};
use once_cell::sync::OnceCell;
use todo_core::repo::mapper::{to_record, to_task};
use todo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppConfig, SqliteTaskStore, Task, TaskDetailController, TaskDetailUiState, TaskId,
    TaskListController, TaskListUiState, TaskRecord, TodoApp,
};

static CONTEXT: OnceCell<AppContext> = OnceCell::new();

struct AppContext {
    list: TaskListController<SqliteTaskStore>,
    detail: TaskDetailController<SqliteTaskStore>,
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    /// `0` for a task that has not been saved yet.
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Unix epoch milliseconds.
    pub creation_date_ms: i64,
    pub completed: bool,
}

/// Task list screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListView {
    /// Newest first.
    pub tasks: Vec<TaskItem>,
    pub is_adding_task_dialog_open: bool,
    pub selected_task_for_edit: Option<TaskItem>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub is_success: bool,
}

/// Task detail screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetailView {
    pub task: Option<TaskItem>,
    pub is_editing: bool,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub is_success: bool,
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_list_state() -> TaskListView {
    with_list(|_| ())
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_list_open_add_dialog() -> TaskListView {
    with_list(TaskListController::open_add_dialog)
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_list_dismiss_add_dialog() -> TaskListView {
    with_list(TaskListController::dismiss_add_dialog)
}

/// Selects a listed task for editing; `None` or an unknown id clears it.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_select(task_id: Option<i64>) -> TaskListView {
    with_list(|list| {
        let task = task_id.and_then(|id| find_listed(list, id).ok());
        list.select_task(task);
    })
}

pub fn task_list_add(title: String, description: String) -> TaskListView {
    with_list(|list| list.add_task(&title, &description))
}

pub fn task_list_update(task: TaskItem) -> TaskListView {
    with_list(|list| match from_item(task) {
        Ok(task) => list.update_task(&task),
        Err(message) => list.report_error(message),
    })
}

pub fn task_list_toggle(task_id: i64) -> TaskListView {
    with_list(|list| match find_listed(list, task_id) {
        Ok(task) => list.toggle_complete(&task),
        Err(message) => list.report_error(message),
    })
}

pub fn task_list_delete(task_id: i64) -> TaskListView {
    with_list(|list| match find_listed(list, task_id) {
        Ok(task) => list.delete_task(&task),
        Err(message) => list.report_error(message),
    })
}

pub fn task_list_delete_all() -> TaskListView {
    with_list(TaskListController::delete_all_tasks)
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_list_clear_error() -> TaskListView {
    with_list(TaskListController::clear_error)
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_list_clear_success() -> TaskListView {
    with_list(TaskListController::clear_success)
}

pub fn task_detail_load(task_id: i64) -> TaskDetailView {
    with_detail(|detail| detail.load(task_id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_detail_start_editing() -> TaskDetailView {
    with_detail(TaskDetailController::start_editing)
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_detail_cancel_editing() -> TaskDetailView {
    with_detail(TaskDetailController::cancel_editing)
}

pub fn task_detail_update(task: TaskItem) -> TaskDetailView {
    with_detail(|detail| match from_item(task) {
        Ok(task) => detail.update_task(&task),
        Err(message) => detail.report_error(message),
    })
}

/// Deletes the task currently shown on the detail screen, if any.
pub fn task_detail_delete() -> TaskDetailView {
    with_detail(|detail| {
        if let Some(task) = detail.state().task {
            detail.delete_task(&task);
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_detail_clear_error() -> TaskDetailView {
    with_detail(TaskDetailController::clear_error)
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_detail_clear_success() -> TaskDetailView {
    with_detail(TaskDetailController::clear_success)
}

fn context() -> Result<&'static AppContext, String> {
    CONTEXT.get_or_try_init(|| {
        let config = AppConfig::from_env();
        let app = TodoApp::open(&config).map_err(|err| {
            error!("event=ffi_app_open module=ffi status=error error={err}");
            format!("task database open failed: {err}")
        })?;
        Ok(AppContext {
            list: app.task_list_controller(),
            detail: app.task_detail_controller(),
        })
    })
}

fn with_list(action: impl FnOnce(&TaskListController<SqliteTaskStore>)) -> TaskListView {
    match context() {
        Ok(ctx) => {
            action(&ctx.list);
            // Pick up writes made through the detail screen.
            ctx.list.sync_tasks();
            to_list_view(ctx.list.state())
        }
        Err(message) => TaskListView {
            tasks: Vec::new(),
            is_adding_task_dialog_open: false,
            selected_task_for_edit: None,
            is_loading: false,
            error_message: Some(message),
            is_success: false,
        },
    }
}

fn with_detail(action: impl FnOnce(&TaskDetailController<SqliteTaskStore>)) -> TaskDetailView {
    match context() {
        Ok(ctx) => {
            action(&ctx.detail);
            to_detail_view(ctx.detail.state())
        }
        Err(message) => TaskDetailView {
            task: None,
            is_editing: false,
            is_loading: false,
            error_message: Some(message),
            is_success: false,
        },
    }
}

fn find_listed(list: &TaskListController<SqliteTaskStore>, id: TaskId) -> Result<Task, String> {
    list.state()
        .tasks
        .into_iter()
        .find(|task| task.id == id)
        .ok_or_else(|| {
            warn!("event=ffi_task_lookup module=ffi status=rejected error_code=unknown_id task_id={id}");
            format!("Task {id} is not in the list")
        })
}

fn to_item(task: &Task) -> TaskItem {
    let record = to_record(task);
    TaskItem {
        id: record.id,
        title: record.title,
        description: record.description,
        creation_date_ms: record.creation_date,
        completed: record.completed,
    }
}

fn from_item(item: TaskItem) -> Result<Task, String> {
    to_task(TaskRecord {
        id: item.id,
        title: item.title,
        description: item.description,
        creation_date: item.creation_date_ms,
        completed: item.completed,
    })
    .map_err(|err| {
        warn!("event=ffi_task_item module=ffi status=rejected error_code=invalid_item error={err}");
        format!("Invalid task: {err}")
    })
}

fn to_list_view(state: TaskListUiState) -> TaskListView {
    TaskListView {
        tasks: state.tasks.iter().map(to_item).collect(),
        is_adding_task_dialog_open: state.is_adding_task_dialog_open,
        selected_task_for_edit: state.selected_task_for_edit.as_ref().map(to_item),
        is_loading: state.is_loading,
        error_message: state.error_message,
        is_success: state.is_success,
    }
}

fn to_detail_view(state: TaskDetailUiState) -> TaskDetailView {
    TaskDetailView {
        task: state.task.as_ref().map(to_item),
        is_editing: state.is_editing,
        is_loading: state.is_loading,
        error_message: state.error_message,
        is_success: state.is_success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard, Once, PoisonError};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEST_DB: Once = Once::new();
    static SERIAL: Mutex<()> = Mutex::new(());

    /// Points the shared context at a scratch database and serializes tests
    /// that touch it.
    fn use_test_db() -> MutexGuard<'static, ()> {
        TEST_DB.call_once(|| {
            let path = std::env::temp_dir().join(format!(
                "todo-ffi-test-{}-{}.sqlite3",
                std::process::id(),
                unique_suffix()
            ));
            std::env::set_var(todo_core::config::DB_PATH_ENV, path);
        });
        SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn unique_suffix() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos()
    }

    fn unique_title(prefix: &str) -> String {
        format!("{prefix}-{}", unique_suffix() % 1_000_000_000)
    }

    fn find_titled(view: &TaskListView, title: &str) -> Option<TaskItem> {
        view.tasks.iter().find(|item| item.title == title).cloned()
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn add_toggle_delete_round_trip() {
        let _db = use_test_db();
        let title = unique_title("ffi-roundtrip");

        let view = task_list_add(title.clone(), String::new());
        let item = find_titled(&view, &title).expect("added task should be listed");
        assert!(item.id > 0);
        assert!(!item.completed);

        let view = task_list_toggle(item.id);
        assert!(find_titled(&view, &title).unwrap().completed);

        let view = task_list_delete(item.id);
        assert!(find_titled(&view, &title).is_none());
    }

    #[test]
    fn blank_add_is_ignored() {
        let _db = use_test_db();
        let before = task_list_state().tasks.len();
        let view = task_list_add("  ".to_string(), "body".to_string());
        assert!(view.tasks.len() >= before);
        assert!(view.tasks.iter().all(|item| item.description != "body"));
    }

    #[test]
    fn detail_load_and_edit() {
        let _db = use_test_db();
        let title = unique_title("ffi-detail");
        let view = task_list_add(title.clone(), "details".to_string());
        let item = find_titled(&view, &title).unwrap();

        let detail = task_detail_load(item.id);
        assert_eq!(detail.task.as_ref(), Some(&item));

        let renamed = unique_title("ffi-renamed");
        let detail = task_detail_update(TaskItem {
            title: renamed.clone(),
            ..item
        });
        assert!(detail.is_success);
        assert_eq!(detail.task.map(|task| task.title), Some(renamed.clone()));
        assert!(find_titled(&task_list_state(), &renamed).is_some());
    }

    #[test]
    fn unknown_id_and_bad_date_surface_errors() {
        let _db = use_test_db();

        let view = task_list_toggle(i64::MAX);
        assert!(view.error_message.unwrap().contains("not in the list"));
        task_list_clear_error();

        let view = task_list_delete(i64::MAX);
        assert!(view.error_message.is_some());
        assert!(task_list_clear_error().error_message.is_none());

        let view = task_list_update(TaskItem {
            id: 1,
            title: "Bad date".to_string(),
            description: String::new(),
            creation_date_ms: i64::MAX,
            completed: false,
        });
        assert!(view.error_message.unwrap().starts_with("Invalid task:"));
        task_list_clear_error();
    }

    #[test]
    fn too_long_title_surfaces_error() {
        let _db = use_test_db();
        let view = task_list_add("x".repeat(todo_core::MAX_TITLE_LENGTH + 1), String::new());
        assert!(view.error_message.is_some());
        task_list_clear_error();
    }
}
